use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use formal::prelude::*;
use formal::validators::{is_phone_number, is_required, is_valid_email, is_valid_url, min_length};

fn main() -> formal::Result<()> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("Failed to initialize logger");

    let mut form = FieldStore::builder()
        .field("name", "", [is_required()])
        .field("email", "", [is_required(), is_valid_email()])
        .field("password", "", [is_required(), min_length(8, "Must be at least 8 characters.")])
        .field("phone", "", [is_phone_number()])
        .field("website", "", [is_valid_url()])
        .field("bio", "", [])
        .on_change(|change| log::info!("{} -> {:?}", change.key, change.kind))
        .build();

    // Keystrokes.
    for partial in ["w", "wo", "wow", "wow@", "wow@wow.com"] {
        form.handle_change("email")(partial)?;
        println!("email = {partial:<12} error = {:?}", form.errors_of("email")?);
    }
    form.handle_change("name")("Matt Damon")?;
    form.handle_change("password")("hunter2")?;

    // Submit.
    form.set_submitted(true);
    form.validate_all_fields();
    for error in form.errors() {
        println!("{}: {}", error.key, error.message);
    }
    println!("valid: {}", form.is_valid());

    form.handle_change("password")("correct horse battery")?;
    form.handle_change("phone")("+1 555 123 4567")?;
    form.handle_change("website")("example.com")?;
    println!("valid: {}", form.is_valid());

    let trimmed = ValuesOptions::new().format(|s| s.trim().to_string());
    for (key, value) in form.values_with(&trimmed) {
        println!("{key} = {value:?}");
    }

    form.clear_all_fields();
    println!("after clear, valid: {}", form.is_valid());
    Ok(())
}
