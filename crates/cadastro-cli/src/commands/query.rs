//! list / show / find

use cadastro_core::{EmployeeId, EmployeeIndex};
use cadastro_engine::{FeedbackSink, Operation};
use clap::{Args, ValueEnum};

use super::Context;
use crate::terminal::{print_employee, print_employees, TerminalFeedback};

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: EmployeeId,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum IndexArg {
    Nome,
    Cpf,
    Email,
    Telefone,
    Cargo,
}

impl From<IndexArg> for EmployeeIndex {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Nome => EmployeeIndex::Nome,
            IndexArg::Cpf => EmployeeIndex::Cpf,
            IndexArg::Email => EmployeeIndex::Email,
            IndexArg::Telefone => EmployeeIndex::Telefone,
            IndexArg::Cargo => EmployeeIndex::Cargo,
        }
    }
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Indexed field to search
    #[arg(long, value_enum)]
    pub by: IndexArg,
    /// Exact value to match
    pub value: String,
}

pub async fn list(ctx: &Context) -> bool {
    ctx.listing_form().start().await
}

pub async fn show(ctx: &Context, args: ShowArgs) -> bool {
    let store = ctx.store();
    let result = match store.open().await {
        Ok(()) => store.get(args.id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(employee) => {
            print_employee(&employee, ctx.json);
            true
        }
        Err(e) => {
            TerminalFeedback.show(Operation::List.failure(&e));
            false
        }
    }
}

pub async fn find(ctx: &Context, args: FindArgs) -> bool {
    let store = ctx.store();
    let result = match store.open().await {
        Ok(()) => store.find_by(args.by.into(), &args.value).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(employees) => {
            print_employees(&employees, ctx.json);
            true
        }
        Err(e) => {
            TerminalFeedback.show(Operation::List.failure(&e));
            false
        }
    }
}
