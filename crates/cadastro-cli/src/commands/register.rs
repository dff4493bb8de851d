//! add / update / delete

use cadastro_core::{EmployeeField, EmployeeId};
use clap::Args;

use super::Context;
use crate::terminal::print_employee;

/// Employee fields as command-line flags
///
/// Every flag is optional here so that a missing value is reported by
/// validation like a blank form field.
#[derive(Debug, Args)]
pub struct FieldArgs {
    #[arg(long)]
    pub nome: Option<String>,
    #[arg(long)]
    pub cpf: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub telefone: Option<String>,
    #[arg(long)]
    pub data_nascimento: Option<String>,
    #[arg(long)]
    pub cargo: Option<String>,
}

impl FieldArgs {
    fn into_fields(self) -> Vec<(EmployeeField, String)> {
        [
            (EmployeeField::Nome, self.nome),
            (EmployeeField::Cpf, self.cpf),
            (EmployeeField::Email, self.email),
            (EmployeeField::Telefone, self.telefone),
            (EmployeeField::DataNascimento, self.data_nascimento),
            (EmployeeField::Cargo, self.cargo),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

fn keyed(fields: Vec<(EmployeeField, String)>) -> Vec<(&'static str, String)> {
    fields
        .into_iter()
        .map(|(field, value)| (field.as_str(), value))
        .collect()
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: EmployeeId,
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: EmployeeId,
}

pub async fn add(ctx: &Context, args: AddArgs) -> bool {
    let form = ctx.editing_form();
    if !form.connect().await {
        return false;
    }

    match form.submit(keyed(args.fields.into_fields())).await {
        Some(id) => {
            println!("{}", id);
            true
        }
        None => false,
    }
}

pub async fn update(ctx: &Context, args: UpdateArgs) -> bool {
    let form = ctx.editing_form();
    if !form.connect().await {
        return false;
    }

    match form.edit(args.id, keyed(args.fields.into_fields())).await {
        Some(employee) => {
            print_employee(&employee, ctx.json);
            true
        }
        None => false,
    }
}

pub async fn delete(ctx: &Context, args: DeleteArgs) -> bool {
    let form = ctx.editing_form();
    form.connect().await && form.remove(args.id).await
}
