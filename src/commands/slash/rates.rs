//! # Rate Command
//!
//! `/rate` with a currency choice.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_rate_command()]
}

fn create_rate_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("rate")
        .description("Today's exchange rate")
        .create_option(|option| {
            option
                .name("currency")
                .description("Currency to look up")
                .kind(CommandOptionType::String)
                .required(true)
                .add_string_choice("🇺🇸 US Dollar", "USD")
                .add_string_choice("🇪🇺 Euro", "EUR")
                .add_string_choice("🇨🇳 Chinese Yuan", "CNY")
        });
    command
}
