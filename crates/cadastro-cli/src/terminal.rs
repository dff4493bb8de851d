//! Terminal collaborators: feedback on stderr, records on stdout

use cadastro_core::Employee;
use cadastro_engine::{Feedback, FeedbackSink, ListView};

pub struct TerminalFeedback;

impl FeedbackSink for TerminalFeedback {
    fn show(&self, feedback: Feedback) {
        eprintln!("{}", feedback);
    }
}

pub struct LineListView;

impl ListView for LineListView {
    fn render(&self, employees: &[Employee]) {
        print_employees(employees, false);
    }
}

pub struct JsonListView;

impl ListView for JsonListView {
    fn render(&self, employees: &[Employee]) {
        print_employees(employees, true);
    }
}

/// Mutations refresh the list, but the CLI only prints it on `list`
pub struct SilentListView;

impl ListView for SilentListView {
    fn render(&self, _employees: &[Employee]) {}
}

pub fn format_line(employee: &Employee) -> String {
    format!(
        "ID: {} - Nome: {} - CPF: {} - Email: {} - Telefone: {} - Cargo: {} - Data de nascimento: {}",
        employee.id,
        employee.nome,
        employee.cpf,
        employee.email,
        employee.telefone,
        employee.cargo,
        employee.data_nascimento
    )
}

pub fn print_employees(employees: &[Employee], json: bool) {
    if json {
        match serde_json::to_string_pretty(employees) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        for employee in employees {
            println!("{}", format_line(employee));
        }
    }
}

pub fn print_employee(employee: &Employee, json: bool) {
    if json {
        match serde_json::to_string_pretty(employee) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        println!("{}", format_line(employee));
    }
}
