use std::path::Path;
use std::process;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::history::parse_history;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_explain(
    query: &str,
    journey_path: &Path,
    seed: Option<u64>,
    output: OutputFormat,
    quiet: bool,
) {
    let json_str = match std::fs::read_to_string(journey_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", journey_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let value: serde_json::Value = match serde_json::from_str(&json_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", journey_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    let history = parse_history(&value);

    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    match careline_core::explain(query, &history, &mut rng) {
        Ok(explanation) => match output {
            OutputFormat::Text => println!("{}", explanation.explanation),
            OutputFormat::Json => match serde_json::to_string_pretty(&explanation) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    report_error(&format!("error serializing explanation: {}", e), output, quiet);
                    process::exit(1);
                }
            },
        },
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}
