// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    validation: ValidationLimits,
    editor: EditorLimits,
}

#[derive(serde::Deserialize)]
struct ValidationLimits {
    max_nesting_depth: usize,
    max_expression_length: usize,
    max_error_value_length: usize,
}

#[derive(serde::Deserialize)]
struct EditorLimits {
    max_nesting_depth: usize,
    max_tree_nodes: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FILTER_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=FILTER_CONFIG_DIR");

    let profile = env::var("FILTER_BUILD_PROFILE").unwrap_or_else(|_| "default".to_string());
    let config_dir = env::var("FILTER_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of filter_expr directory)
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

    validate_limits(&config);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig) {
    const ABSOLUTE_MAX_NESTING_DEPTH: usize = 256;
    const ABSOLUTE_MAX_EXPRESSION_LENGTH: usize = 64 * 1024 * 1024;

    if config.validation.max_nesting_depth == 0
        || config.validation.max_nesting_depth > ABSOLUTE_MAX_NESTING_DEPTH
    {
        panic!("validation.max_nesting_depth must be within 1..={ABSOLUTE_MAX_NESTING_DEPTH}");
    }

    if config.validation.max_expression_length > ABSOLUTE_MAX_EXPRESSION_LENGTH {
        panic!("validation.max_expression_length exceeds absolute maximum");
    }

    if config.editor.max_nesting_depth > config.validation.max_nesting_depth {
        panic!("editor.max_nesting_depth cannot exceed validation.max_nesting_depth");
    }

    if config.validation.max_error_value_length < 8 {
        panic!("validation.max_error_value_length too small (min: 8)");
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
    pub mod validation {{
        pub const MAX_NESTING_DEPTH: usize = {};
        pub const MAX_EXPRESSION_LENGTH: usize = {};
        pub const MAX_ERROR_VALUE_LENGTH: usize = {};
    }}

    pub mod editor {{
        pub const MAX_NESTING_DEPTH: usize = {};
        pub const MAX_TREE_NODES: usize = {};
    }}
}}
"#,
        profile,
        config.validation.max_nesting_depth,
        config.validation.max_expression_length,
        config.validation.max_error_value_length,
        config.editor.max_nesting_depth,
        config.editor.max_tree_nodes,
    );

    fs::write(output_path, constants_code).unwrap();
}
