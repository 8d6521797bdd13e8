//! Build script: validates column-synonyms.json at compile time.

use std::collections::HashSet;
use std::path::PathBuf;

const KNOWN_FIELDS: &[&str] = &[
    "descripcion",
    "proveedor",
    "costo_unitario",
    "margen",
    "precio_unitario",
    "unidad",
    "cantidad",
    "importe",
];

fn main() {
    let manifest_dir =
        std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR set by Cargo");
    let config_path: PathBuf = [&manifest_dir, "config", "column-synonyms.json"]
        .iter()
        .collect();
    println!("cargo:rerun-if-changed={}", config_path.display());
    println!("cargo:rerun-if-changed=config/quotation-prompt.md");

    let json = std::fs::read_to_string(&config_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read {}: {}. column-synonyms.json must exist and be valid.",
            config_path.display(),
            e
        )
    });
    #[derive(serde::Deserialize)]
    struct SynonymEntry {
        field: String,
        synonyms: Vec<String>,
    }
    let entries: Vec<SynonymEntry> = serde_json::from_str(&json).unwrap_or_else(|e| {
        panic!(
            "column-synonyms.json is invalid JSON: {}. Fix the file and rebuild.",
            e
        )
    });

    let mut seen_fields = HashSet::new();
    let mut seen_synonyms = HashSet::new();
    for entry in &entries {
        if !KNOWN_FIELDS.contains(&entry.field.as_str()) {
            panic!("column-synonyms.json: unknown field '{}'", entry.field);
        }
        if !seen_fields.insert(entry.field.as_str()) {
            panic!("column-synonyms.json: field '{}' listed twice", entry.field);
        }
        if entry.synonyms.is_empty() {
            panic!("column-synonyms.json: field '{}' has no synonyms", entry.field);
        }
        for syn in &entry.synonyms {
            // Headers are normalized to lowercase ASCII before lookup.
            if syn.trim() != syn || syn.is_empty() || !syn.is_ascii() || syn.to_lowercase() != *syn
            {
                panic!(
                    "column-synonyms.json: synonym '{}' must be trimmed lowercase ASCII",
                    syn
                );
            }
            if !seen_synonyms.insert(syn.as_str()) {
                panic!("column-synonyms.json: synonym '{}' is ambiguous", syn);
            }
        }
    }
}
