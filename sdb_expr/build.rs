// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    evaluation: EvaluationLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_expression_length: usize,
    max_token_count: usize,
    max_token_text_length: usize,
}

#[derive(serde::Deserialize)]
struct EvaluationLimits {
    max_eval_depth: usize,
    deref_width_bytes: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=SDB_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=SDB_CONFIG_DIR");

    let profile = env::var("SDB_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("SDB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of sdb_expr directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 1_000_000;
    const ABSOLUTE_MAX_EVAL_DEPTH: usize = 10_000;

    if config.lexical.max_token_count == 0 {
        panic!("LIMITS: max_token_count must be positive");
    }

    if config.lexical.max_token_text_length == 0 {
        panic!("LIMITS: max_token_text_length must be positive");
    }

    if config.lexical.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH {
        panic!("LIMITS: max_expression_length exceeds absolute maximum");
    }

    if config.evaluation.max_eval_depth == 0
        || config.evaluation.max_eval_depth > ABSOLUTE_MAX_EVAL_DEPTH
    {
        panic!("LIMITS: max_eval_depth must be within 1..={}", ABSOLUTE_MAX_EVAL_DEPTH);
    }

    // Memory reads are assembled into a 32-bit machine word
    if !matches!(config.evaluation.deref_width_bytes, 1 | 2 | 4) {
        panic!("LIMITS: deref_width_bytes must be 1, 2 or 4");
    }

    if profile == "production" && config.lexical.max_expression_length > 64 * 1024 {
        panic!("PRODUCTION: max_expression_length too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_TOKEN_TEXT_LENGTH: usize = {};
    }}

    pub mod evaluation {{
        pub const MAX_EVAL_DEPTH: usize = {};
        pub const DEREF_WIDTH_BYTES: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.lexical.max_expression_length,
        config.lexical.max_token_count,
        config.lexical.max_token_text_length,
        config.evaluation.max_eval_depth,
        config.evaluation.deref_width_bytes,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
