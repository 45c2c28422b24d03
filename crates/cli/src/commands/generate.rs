use std::process;

use careline_core::JourneyConfig;

use crate::config::Overrides;
use crate::{report_error, OutputFormat};

pub(crate) fn cmd_generate(
    base: JourneyConfig,
    overrides: Overrides,
    split: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let config = match overrides.apply(base) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    let journey = match careline_core::generate(&config) {
        Ok(j) => j,
        Err(e) => {
            report_error(&format!("generation error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let rendered = if split {
        serde_json::to_string_pretty(&journey.split())
    } else {
        serde_json::to_string_pretty(&journey.events)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            report_error(&format!("error serializing journey: {}", e), output, quiet);
            process::exit(1);
        }
    }
}
