use regex::Regex;

use crate::models::LicenceMatch;

/// Matches scoring below this are not reported.
pub const MIN_CONFIDENCE: f32 = 0.5;

/// Characteristic phrases of a licence text, already normalized.
struct Signature {
    licence: &'static str,
    phrases: &'static [&'static str],
    /// Any of these disqualifies the licence (e.g. BSD-2-Clause is a prefix of BSD-3-Clause).
    excludes: &'static [&'static str],
}

const SIGNATURES: &[Signature] = &[
    Signature {
        licence: "MIT",
        phrases: &[
            "permission is hereby granted free of charge to any person obtaining a copy of this software",
            "to deal in the software without restriction",
            "the above copyright notice and this permission notice shall be included in all copies or substantial portions of the software",
        ],
        excludes: &[],
    },
    Signature {
        licence: "ISC",
        phrases: &[
            "permission to use copy modify and or distribute this software for any purpose with or without fee is hereby granted",
            "provided that the above copyright notice and this permission notice appear in all copies",
            "the software is provided as is and the author disclaims all warranties with regard to this software",
        ],
        excludes: &[],
    },
    Signature {
        licence: "BSD-2-Clause",
        phrases: &[
            "redistribution and use in source and binary forms with or without modification are permitted provided that the following conditions are met",
            "redistributions of source code must retain the above copyright notice",
            "redistributions in binary form must reproduce the above copyright notice",
        ],
        excludes: &["neither the name of"],
    },
    Signature {
        licence: "BSD-3-Clause",
        phrases: &[
            "redistribution and use in source and binary forms with or without modification are permitted provided that the following conditions are met",
            "redistributions of source code must retain the above copyright notice",
            "redistributions in binary form must reproduce the above copyright notice",
            "neither the name of",
            "endorse or promote products derived from this software without specific prior written permission",
        ],
        excludes: &[],
    },
    Signature {
        licence: "Apache-2.0",
        phrases: &[
            "apache license version 2 0",
            "terms and conditions for use reproduction and distribution",
            "grant of patent license",
            "licensed under the apache license version 2 0",
        ],
        excludes: &[],
    },
    Signature {
        licence: "GPL-2.0",
        phrases: &[
            "gnu general public license",
            "version 2 june 1991",
            "the licenses for most software are designed to take away your freedom to share and change it",
        ],
        excludes: &[],
    },
    Signature {
        licence: "GPL-3.0",
        phrases: &[
            "gnu general public license",
            "version 3 29 june 2007",
            "the gnu general public license is a free copyleft license for software and other kinds of works",
        ],
        excludes: &[],
    },
    Signature {
        licence: "LGPL-2.1",
        phrases: &[
            "gnu lesser general public license",
            "version 2 1 february 1999",
            "this license the lesser general public license applies to some specially designated software packages",
        ],
        excludes: &[],
    },
    Signature {
        licence: "LGPL-3.0",
        phrases: &[
            "gnu lesser general public license",
            "version 3 29 june 2007",
            "this version of the gnu lesser general public license incorporates the terms and conditions of version 3 of the gnu general public license",
        ],
        excludes: &[],
    },
    Signature {
        licence: "AGPL-3.0",
        phrases: &[
            "gnu affero general public license",
            "version 3 19 november 2007",
            "the gnu affero general public license is a free copyleft license for software and other kinds of works",
        ],
        excludes: &[],
    },
    Signature {
        licence: "MPL-2.0",
        phrases: &[
            "mozilla public license version 2 0",
            "this source code form is subject to the terms of the mozilla public license",
            "exhibit a source code form license notice",
        ],
        excludes: &[],
    },
    Signature {
        licence: "EPL-2.0",
        phrases: &[
            "eclipse public license v 2 0",
            "the accompanying program is provided under the terms of this eclipse public license",
        ],
        excludes: &[],
    },
    Signature {
        licence: "BSL-1.0",
        phrases: &[
            "boost software license version 1 0",
            "permission is hereby granted free of charge to any person or organization obtaining a copy of the software",
        ],
        excludes: &[],
    },
    Signature {
        licence: "Unlicense",
        phrases: &[
            "this is free and unencumbered software released into the public domain",
            "anyone is free to copy modify publish use compile sell or distribute this software",
        ],
        excludes: &[],
    },
];

/// Scores licence texts against the known licence signatures.
pub struct TextScorer {
    non_alnum: Regex,
}

impl TextScorer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            non_alnum: Regex::new(r"[^a-z0-9]+")?,
        })
    }

    /// Lowercase, replace anything but letters and digits by spaces, collapse whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        self.non_alnum.replace_all(&lower, " ").trim().to_string()
    }

    /// Score `text` against every known licence.
    ///
    /// Confidence is the share of a licence's phrases found in the text; only
    /// licences reaching [`MIN_CONFIDENCE`] are returned, in no particular order.
    pub fn score(&self, text: &str) -> Vec<LicenceMatch> {
        // Pad so phrases only match on word boundaries.
        let normalized = format!(" {} ", self.normalize(text));
        let contains = |phrase: &str| normalized.contains(&format!(" {} ", phrase));

        SIGNATURES
            .iter()
            .filter(|sig| !sig.excludes.iter().any(|p| contains(p)))
            .filter_map(|sig| {
                let found = sig.phrases.iter().filter(|p| contains(p)).count();
                let confidence = found as f32 / sig.phrases.len() as f32;
                (confidence >= MIN_CONFIDENCE).then(|| LicenceMatch::new(sig.licence, confidence))
            })
            .collect()
    }
}
