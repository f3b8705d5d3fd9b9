//! Abbreviations that should not end a sentence when followed by a period.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Lowercase abbreviations without their trailing period.
pub static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "mr", "mrs", "ms", "dr", "prof", "rev", "sr", "jr", "hon", "esq", "capt", "col", "gen",
        "lt", "maj", "sgt", "sen", "rep", "gov", "pres",
    ]);

    // Latin and reference shorthand
    set.extend([
        "etc", "vs", "e.g", "i.e", "et al", "cf", "viz", "ibid", "n.b", "p.s", "approx", "fig",
        "eq", "vol", "ch", "pp", "ref", "refs", "ed", "eds", "misc",
    ]);

    // Degrees
    set.extend(["b.a", "b.s", "m.a", "m.s", "m.b.a", "ph.d", "phd", "m.d", "j.d"]);

    // Time and dates
    set.extend([
        "a.m", "p.m", "b.c", "a.d", "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep",
        "sept", "oct", "nov", "dec", "mon", "tue", "tues", "wed", "thu", "thurs", "fri",
    ]);

    // Places and organisations
    set.extend([
        "st", "ave", "blvd", "rd", "apt", "dept", "u.s", "u.k", "u.s.a", "e.u", "inc", "corp",
        "ltd", "llc", "co", "bros", "intl",
    ]);

    // Units
    set.extend(["oz", "lb", "lbs", "kg", "mg", "ml", "cm", "mm", "km", "ft", "yd", "mph"]);

    set
});

/// Check if a word (with or without trailing periods) is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(lower.trim_matches('.'))
}
