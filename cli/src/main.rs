use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use protoline::{encode_message, parse_file_with, EncodedMessage, JsonRecord, Message, ParseOptions, ProtoError};
use tracing::info;

#[derive(Parser)]
#[command(name = "protoline")]
#[command(about = "Parse protoline schemas, export them as JSON, or encode JSON messages", long_about = None)]
struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a schema file and print the resulting model
    Parse {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        /// Also print the JSON of this message
        #[arg(short, long)]
        message: Option<String>,

        /// Reject unclosed messages, duplicate names and duplicate sequences
        #[arg(long)]
        strict: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print every message of a schema file as a JSON array
    Json {
        /// Input schema file
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        strict: bool,

        #[arg(long)]
        pretty: bool,
    },

    /// Encode the example values of a JSON message record
    Encode {
        /// Input JSON file holding one message record
        #[arg(short, long)]
        input: PathBuf,

        /// Write the encoded bytes here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_fatal() => {
            eprintln!("Aborting: {}", err);
            ExitCode::from(255)
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: &Commands) -> Result<(), ProtoError> {
    match command {
        Commands::Parse { input, message, strict, pretty } => {
            let file = parse_file_with(input, &ParseOptions { strict: *strict })?;
            print!("{}", file);
            if let Some(name) = message {
                let message = file
                    .get(name)
                    .ok_or_else(|| ProtoError::Param(format!("Message {:?} not found", name)))?;
                let json = if *pretty { message.to_json_pretty()? } else { message.to_json_string()? };
                println!("{}", json);
            }
            Ok(())
        }

        Commands::Json { input, strict, pretty } => {
            let file = parse_file_with(input, &ParseOptions { strict: *strict })?;
            let messages = file.messages_to_json()?;
            let json = if *pretty {
                serde_json::to_string_pretty(&messages)?
            } else {
                serde_json::to_string(&messages)?
            };
            println!("{}", json);
            Ok(())
        }

        Commands::Encode { input, output } => {
            let text = fs::read_to_string(input)?;
            let message = Message::from_json_str(&text)?;
            let encoded = encode_message(&message)?;

            print!("{}", encode_report(&encoded));

            if let Some(out_path) = output {
                fs::write(out_path, &encoded.bytes)?;
                info!(path = %out_path.display(), bytes = encoded.len(), "wrote encoded message");
                println!("Encoded {} → {}", input.display(), out_path.display());
            }
            Ok(())
        }
    }
}

/// Text form, length and lowercase hex of an encoded message.
fn encode_report(encoded: &EncodedMessage) -> String {
    format!(
        "[protobuf message]:\n{}\n[protobuf message length]: {}\n[protobuf message serialize binary data]: {}\n",
        encoded.text,
        encoded.len(),
        hex::encode(&encoded.bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use protoline::json_to_wire;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn encode_report_prints_hex() {
        let encoded = json_to_wire(
            r#"{"message_name": "Test3", "field_list": [
                {"field_name": "first_field", "field_type": "string", "field_property": "required",
                 "field_sequence": 1, "field_value": "hello,world"},
                {"field_name": "second_field", "field_type": "int32", "field_property": "optional",
                 "field_sequence": 2, "field_value": 10086}
            ]}"#,
        )
        .unwrap();
        let report = encode_report(&encoded);
        assert!(report.contains("[protobuf message length]: 16\n"), "{}", report);
        assert!(
            report.ends_with("[protobuf message serialize binary data]: 0a0b68656c6c6f2c776f726c6410e64e\n"),
            "{}",
            report
        );
    }
}
