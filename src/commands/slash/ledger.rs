//! # Ledger Commands
//!
//! `/add`, `/income`, `/categories`, `/clear`.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_add_command(),
        create_income_command(),
        create_categories_command(),
        create_clear_command(),
    ]
}

fn create_add_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("add")
        .description("Record an expense; omit the options to enter it in chat")
        .create_option(|option| {
            option
                .name("amount")
                .description("Amount spent")
                .kind(CommandOptionType::Number)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("category")
                .description("Expense category, e.g. Food")
                .kind(CommandOptionType::String)
                .required(false)
        });
    command
}

fn create_income_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("income")
        .description("Record an income; omit the options to enter it in chat")
        .create_option(|option| {
            option
                .name("amount")
                .description("Amount received")
                .kind(CommandOptionType::Number)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("source")
                .description("Income source, e.g. Salary")
                .kind(CommandOptionType::String)
                .required(false)
        });
    command
}

fn create_categories_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("categories")
        .description("List your categories or delete one")
        .create_option(|option| {
            option
                .name("action")
                .description("What to do")
                .kind(CommandOptionType::String)
                .required(false)
                .add_string_choice("list", "list")
                .add_string_choice("delete", "delete")
        });
    command
}

fn create_clear_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("clear")
        .description("Delete your whole transaction history");
    command
}
