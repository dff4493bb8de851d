use serde::{Deserialize, Serialize};

use crate::errors::{EmployeeError, Result};

/// Store-assigned employee identifier
///
/// Allocated by the store on insert, strictly increasing, never reused
/// after a delete and never changed by an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(i64);

impl EmployeeId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for EmployeeId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EmployeeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// The six user-editable fields of an employee record
///
/// `as_str` is both the form key and the column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeField {
    Nome,
    Cpf,
    Email,
    Telefone,
    DataNascimento,
    Cargo,
}

impl EmployeeField {
    /// All fields in form order
    pub const ALL: [EmployeeField; 6] = [
        EmployeeField::Nome,
        EmployeeField::Cpf,
        EmployeeField::Email,
        EmployeeField::Telefone,
        EmployeeField::DataNascimento,
        EmployeeField::Cargo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeField::Nome => "nome",
            EmployeeField::Cpf => "cpf",
            EmployeeField::Email => "email",
            EmployeeField::Telefone => "telefone",
            EmployeeField::DataNascimento => "data_nascimento",
            EmployeeField::Cargo => "cargo",
        }
    }

    /// Resolve a form key to a field
    ///
    /// # Errors
    ///
    /// `ValidationFailed` for `id` (store-assigned) and for any unknown key.
    pub fn from_key(key: &str) -> Result<Self> {
        if key == "id" {
            return Err(EmployeeError::ValidationFailed {
                field: "id".to_string(),
                reason: "id is assigned by the store and cannot be set".to_string(),
            });
        }
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| EmployeeError::ValidationFailed {
                field: key.to_string(),
                reason: "unknown field".to_string(),
            })
    }
}

impl std::fmt::Display for EmployeeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary indexes on the `funcionarios` collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmployeeIndex {
    Nome,
    Cpf,
    Email,
    Telefone,
    Cargo,
}

impl EmployeeIndex {
    pub const ALL: [EmployeeIndex; 5] = [
        EmployeeIndex::Nome,
        EmployeeIndex::Cpf,
        EmployeeIndex::Email,
        EmployeeIndex::Telefone,
        EmployeeIndex::Cargo,
    ];

    /// The indexed field
    pub fn field(&self) -> EmployeeField {
        match self {
            EmployeeIndex::Nome => EmployeeField::Nome,
            EmployeeIndex::Cpf => EmployeeField::Cpf,
            EmployeeIndex::Email => EmployeeField::Email,
            EmployeeIndex::Telefone => EmployeeField::Telefone,
            EmployeeIndex::Cargo => EmployeeField::Cargo,
        }
    }

    /// Index name as created in the database
    pub fn name(&self) -> &'static str {
        match self {
            EmployeeIndex::Nome => "idx_funcionarios_nome",
            EmployeeIndex::Cpf => "idx_funcionarios_cpf",
            EmployeeIndex::Email => "idx_funcionarios_email",
            EmployeeIndex::Telefone => "idx_funcionarios_telefone",
            EmployeeIndex::Cargo => "idx_funcionarios_cargo",
        }
    }

    /// Whether the store rejects duplicate values on this index
    pub fn is_unique(&self) -> bool {
        matches!(
            self,
            EmployeeIndex::Cpf | EmployeeIndex::Email | EmployeeIndex::Telefone
        )
    }
}

/// A persisted employee record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub telefone: String,
    pub data_nascimento: String,
    pub cargo: String,
}

impl Employee {
    /// Build a record from a validated draft and its assigned id
    pub fn from_draft(id: EmployeeId, draft: EmployeeDraft) -> Self {
        Self {
            id,
            nome: draft.nome,
            cpf: draft.cpf,
            email: draft.email,
            telefone: draft.telefone,
            data_nascimento: draft.data_nascimento,
            cargo: draft.cargo,
        }
    }

    pub fn value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::Nome => &self.nome,
            EmployeeField::Cpf => &self.cpf,
            EmployeeField::Email => &self.email,
            EmployeeField::Telefone => &self.telefone,
            EmployeeField::DataNascimento => &self.data_nascimento,
            EmployeeField::Cargo => &self.cargo,
        }
    }

    /// Merge the supplied patch fields onto this record
    ///
    /// Fields absent from the patch are left untouched; `id` never changes.
    pub fn apply(&mut self, patch: EmployeePatch) {
        if let Some(v) = patch.nome {
            self.nome = v;
        }
        if let Some(v) = patch.cpf {
            self.cpf = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.telefone {
            self.telefone = v;
        }
        if let Some(v) = patch.data_nascimento {
            self.data_nascimento = v;
        }
        if let Some(v) = patch.cargo {
            self.cargo = v;
        }
    }
}

/// Input for creating an employee (all fields, no id)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub telefone: String,
    pub data_nascimento: String,
    pub cargo: String,
}

impl EmployeeDraft {
    /// Build a draft from a raw form field map
    ///
    /// Keys missing from the map become empty values, which validation
    /// later reports as required.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the map carries `id` or an unknown key.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut draft = Self::default();
        for (key, value) in fields {
            let field = EmployeeField::from_key(key.as_ref())?;
            *draft.slot_mut(field) = value.as_ref().to_string();
        }
        Ok(draft)
    }

    pub fn value(&self, field: EmployeeField) -> &str {
        match field {
            EmployeeField::Nome => &self.nome,
            EmployeeField::Cpf => &self.cpf,
            EmployeeField::Email => &self.email,
            EmployeeField::Telefone => &self.telefone,
            EmployeeField::DataNascimento => &self.data_nascimento,
            EmployeeField::Cargo => &self.cargo,
        }
    }

    /// Copy of this draft with every value trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            nome: self.nome.trim().to_string(),
            cpf: self.cpf.trim().to_string(),
            email: self.email.trim().to_string(),
            telefone: self.telefone.trim().to_string(),
            data_nascimento: self.data_nascimento.trim().to_string(),
            cargo: self.cargo.trim().to_string(),
        }
    }

    fn slot_mut(&mut self, field: EmployeeField) -> &mut String {
        match field {
            EmployeeField::Nome => &mut self.nome,
            EmployeeField::Cpf => &mut self.cpf,
            EmployeeField::Email => &mut self.email,
            EmployeeField::Telefone => &mut self.telefone,
            EmployeeField::DataNascimento => &mut self.data_nascimento,
            EmployeeField::Cargo => &mut self.cargo,
        }
    }
}

/// Partial update: only the supplied fields are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_nascimento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
}

impl EmployeePatch {
    /// Build a patch from a raw form field map
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the map carries `id` or an unknown key.
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut patch = Self::default();
        for (key, value) in fields {
            let field = EmployeeField::from_key(key.as_ref())?;
            patch = patch.with(field, value.as_ref());
        }
        Ok(patch)
    }

    /// Set one field
    pub fn with(mut self, field: EmployeeField, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match field {
            EmployeeField::Nome => self.nome = value,
            EmployeeField::Cpf => self.cpf = value,
            EmployeeField::Email => self.email = value,
            EmployeeField::Telefone => self.telefone = value,
            EmployeeField::DataNascimento => self.data_nascimento = value,
            EmployeeField::Cargo => self.cargo = value,
        }
        self
    }

    pub fn value(&self, field: EmployeeField) -> Option<&str> {
        match field {
            EmployeeField::Nome => self.nome.as_deref(),
            EmployeeField::Cpf => self.cpf.as_deref(),
            EmployeeField::Email => self.email.as_deref(),
            EmployeeField::Telefone => self.telefone.as_deref(),
            EmployeeField::DataNascimento => self.data_nascimento.as_deref(),
            EmployeeField::Cargo => self.cargo.as_deref(),
        }
    }

    /// Fields carried by this patch, in form order
    pub fn fields(&self) -> Vec<EmployeeField> {
        EmployeeField::ALL
            .into_iter()
            .filter(|f| self.value(*f).is_some())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Copy of this patch with every supplied value trimmed
    pub fn trimmed(&self) -> Self {
        let trim = |v: &Option<String>| v.as_ref().map(|s| s.trim().to_string());
        Self {
            nome: trim(&self.nome),
            cpf: trim(&self.cpf),
            email: trim(&self.email),
            telefone: trim(&self.telefone),
            data_nascimento: trim(&self.data_nascimento),
            cargo: trim(&self.cargo),
        }
    }
}
