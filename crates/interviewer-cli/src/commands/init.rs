//! The `interviewer init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("interviewer.toml").exists() {
        println!("interviewer.toml already exists, skipping.");
    } else {
        std::fs::write("interviewer.toml", SAMPLE_CONFIG)?;
        println!("Created interviewer.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GOOGLE_API_KEY, or set default_provider = \"mock\" to run offline");
    println!("  2. Try it: interviewer evaluate --question \"...\" --answer \"...\" --seconds 100");
    println!("  3. Serve the API: interviewer serve");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# interviewer configuration

default_provider = "gemini"
default_model = "gemini-1.5-flash"
temperature = 0.2
max_tokens = 1024
gate_capacity = 1
request_timeout_secs = 60

[providers.gemini]
type = "gemini"
api_key = "${GOOGLE_API_KEY}"

# Offline provider; set default_provider = "mock" to use it.
[providers.mock]
type = "mock"
response = "- Score: 7/10\n- Evaluation: canned verdict"

[timing]
optimal_min_secs = 90
optimal_max_secs = 120
midpoint_secs = 105
step_secs = 5

[server]
host = "0.0.0.0"
port = 8000

# Replace an evaluation prompt. Placeholders: {answer} for structural and
# coherence; {structural}, {coherence} and {timing} for synthesis.
# [prompts.structural]
# version = 2
# text = "..."
"#;
