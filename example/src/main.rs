// example/src/main.rs

use protoline::*;
use serde_json::json;

const TEST_PROTO: &str = include_str!("../test.proto");

fn pb_to_json() -> Result<(), ProtoError> {
    println!("\n---translate pb to json---");
    let file = parse_schema(TEST_PROTO)?;
    println!("{}", file.message_to_json("Test1")?);
    Ok(())
}

fn json_to_pb() -> Result<(), ProtoError> {
    println!("\n---translate json to pb---");
    let record = json!({
        "message_name": "Test3",
        "message_comment": "third test message",
        "field_list": [
            {
                "field_name": "first_field",
                "field_type": "string",
                "field_property": "required",
                "field_sequence": 1,
                "field_comment": "first field",
                "field_value": "hello,world"
            },
            {
                "field_name": "second_field",
                "field_type": "int32",
                "field_property": "optional",
                "field_sequence": 2,
                "field_comment": "second field",
                "field_value": 10086
            }
        ]
    });

    // Same path a caller holding JSON text would take.
    let encoded = json_to_wire(&record.to_string())?;
    println!("[protobuf message]:\n{}", encoded.text);
    println!("[protobuf message length]: {}", encoded.len());
    println!("[protobuf message serialize binary data]: {:?}", encoded.bytes);
    Ok(())
}

fn main() -> Result<(), ProtoError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    pb_to_json()?;
    json_to_pb()?;
    Ok(())
}
