/// Normalize common non-SPDX strings to their SPDX equivalents.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "Apache 2.0" | "Apache License 2.0" | "Apache License, Version 2.0" | "Apache-2" => {
            "Apache-2.0".to_string()
        }
        "MIT License" | "The MIT License" | "Expat" => "MIT".to_string(),
        "BSD" | "BSD License" => "BSD-3-Clause".to_string(),
        "BSD 2-Clause" | "Simplified BSD" | "FreeBSD" => "BSD-2-Clause".to_string(),
        "BSD 3-Clause" | "New BSD" | "Modified BSD" => "BSD-3-Clause".to_string(),
        "GNU GPL v2" | "GNU General Public License v2" | "GPL v2" | "GPLv2" | "GPL-2.0-only" => {
            "GPL-2.0".to_string()
        }
        "GNU GPL v3" | "GNU General Public License v3" | "GPL v3" | "GPLv3" | "GPL-3.0-only" => {
            "GPL-3.0".to_string()
        }
        "GNU LGPL v2.1" | "LGPL v2.1" | "LGPLv2.1" | "LGPL-2.1-only" => "LGPL-2.1".to_string(),
        "GNU LGPL v3" | "LGPL v3" | "LGPLv3" | "LGPL-3.0-only" => "LGPL-3.0".to_string(),
        "Mozilla Public License 2.0" | "MPL 2.0" | "MPLv2" => "MPL-2.0".to_string(),
        "ISC License" => "ISC".to_string(),
        "CC0" | "Public Domain" => "CC0-1.0".to_string(),
        "AGPL v3" | "AGPLv3" | "GNU AGPL v3" | "AGPL-3.0-only" => "AGPL-3.0".to_string(),
        "Boost Software License 1.0" | "Boost" => "BSL-1.0".to_string(),
        other => other.to_string(),
    }
}

/// `true` when `expr` requires several licences at once (`MIT AND Apache-2.0`).
///
/// Such a project is bound by every term, so no single licence describes it.
pub fn is_compound(expr: &str) -> bool {
    expr.split_whitespace()
        .any(|token| token.trim_matches(|c| c == '(' || c == ')').eq_ignore_ascii_case("AND"))
}

/// Split a declared licence expression into the licences it offers a choice of.
///
/// `OR` and `/` separate alternatives; `WITH` exceptions are dropped and
/// each alternative is [`normalize`]d. Alternatives that are themselves
/// [compound](is_compound) are skipped.
///
/// ```text
/// "MIT OR Apache-2.0"                      -> ["MIT", "Apache-2.0"]
/// "(MIT/Apache-2.0)"                       -> ["MIT", "Apache-2.0"]
/// "GPL-2.0 WITH Classpath-exception-2.0"   -> ["GPL-2.0"]
/// "MIT AND GPL-3.0"                        -> []
/// ```
pub fn alternatives(expr: &str) -> Vec<String> {
    let mut licences = Vec::new();
    for alternative in expr.replace('/', " OR ").split(" OR ") {
        if is_compound(alternative) {
            continue;
        }
        let cleaned = alternative.trim().trim_matches(|c| c == '(' || c == ')').trim();
        let base = cleaned.split(" WITH ").next().unwrap_or(cleaned).trim();
        if base.is_empty() {
            continue;
        }
        let licence = normalize(base);
        if !licences.contains(&licence) {
            licences.push(licence);
        }
    }
    licences
}
