// src/command/closure.rs

//! Option table for Google's Closure compiler.

use crate::command::schema::CommandSchema;

/// Input file or glob; `!`-prefixed entries exclude.
pub const JS: &str = "js";
/// Output bundle path.
pub const JS_OUTPUT_FILE: &str = "js_output_file";
/// Entry module for dependency pruning.
pub const ENTRY_POINT: &str = "entry_point";

const LANGUAGES: &[&str] = &[
    "ECMASCRIPT3",
    "ECMASCRIPT5",
    "ECMASCRIPT5_STRICT",
    "ECMASCRIPT_2015",
    "ECMASCRIPT_2016",
    "ECMASCRIPT_2017",
    "ECMASCRIPT_2018",
    "ECMASCRIPT_2019",
    "ECMASCRIPT_2020",
    "ECMASCRIPT_2021",
    "STABLE",
];

const BOOLEAN: &[&str] = &["true", "false"];

/// The options `buildjs` knows how to pass to the Closure compiler.
pub fn closure_schema() -> CommandSchema {
    let language_in = LANGUAGES.iter().copied().chain(["ECMASCRIPT_NEXT"]);
    let language_out = LANGUAGES.iter().copied().chain(["NO_TRANSPILE"]);

    CommandSchema::new()
        // inputs and outputs
        .repeatable("--js")
        .repeatable("--externs")
        .repeatable("--entry_point")
        .value("--js_output_file")
        .repeatable("--js_module_root")
        .repeatable("--chunk")
        .value("--chunk_output_path_prefix")
        .value("--create_source_map")
        .enumerated("--source_map_format", ["DEFAULT", "V3"])
        .repeatable("--source_map_location_mapping")
        .value("--output_wrapper")
        .value("--output_wrapper_file")
        .value("--output_manifest")
        .value("--property_renaming_report")
        .value("--variable_renaming_report")
        .value("--charset")
        // compilation
        .enumerated(
            "--compilation_level",
            [
                "BUNDLE",
                "WHITESPACE_ONLY",
                "SIMPLE",
                "SIMPLE_OPTIMIZATIONS",
                "ADVANCED",
                "ADVANCED_OPTIMIZATIONS",
            ],
        )
        .enumerated("--language_in", language_in)
        .enumerated("--language_out", language_out)
        .enumerated("--dependency_mode", ["NONE", "SORT_ONLY", "PRUNE_LEGACY", "PRUNE"])
        .enumerated(
            "--module_resolution",
            ["BROWSER", "BROWSER_WITH_TRANSFORMED_PREFIXES", "NODE", "WEBPACK"],
        )
        .enumerated("--env", ["BROWSER", "CUSTOM"])
        .enumerated("--isolation_mode", ["NONE", "IIFE"])
        .enumerated("--rewrite_polyfills", BOOLEAN.iter().copied())
        .enumerated("--strict_mode_input", BOOLEAN.iter().copied())
        .enumerated("--emit_use_strict", BOOLEAN.iter().copied())
        .repeatable("--define")
        .repeatable("--extra_annotation_name")
        .flag("--process_common_js_modules")
        .flag("--assume_function_wrapper")
        .flag("--use_types_for_optimization")
        .flag("--generate_exports")
        .flag("--export_local_property_definitions")
        .flag("--angular_pass")
        .flag("--checks_only")
        .flag("--debug")
        // diagnostics
        .enumerated("--warning_level", ["QUIET", "DEFAULT", "VERBOSE"])
        .repeatable("--jscomp_error")
        .repeatable("--jscomp_warning")
        .repeatable("--jscomp_off")
        .repeatable("--hide_warnings_for")
        .enumerated("--error_format", ["STANDARD", "JSON"])
        .repeatable("--formatting")
}
