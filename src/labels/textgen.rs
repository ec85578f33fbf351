//! Pronounceable random labels built from simple syllables.

use crate::rng::RngSession;
use std::collections::HashSet;

/// Consonants of the syllable generator.
pub(crate) const CONSONANTS: [char; 15] = [
    'b', 'p', 'd', 't', 'f', 'v', 's', 'z', 'r', 'l', 'g', 'k', 'm', 'n', 'h',
];

/// Vowels of the syllable generator.
pub(crate) const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

/// Syllable patterns; `C` is a consonant and `V` a vowel. `CV` is listed twice.
const PATTERNS: [&str; 4] = ["V", "CV", "CV", "CVC"];

/// Consonant clusters considered hard to read, reduced to one of their sounds.
const COMPLEX_CLUSTERS: [&str; 13] = [
    "pb", "bp", "sz", "zs", "dl", "gk", "kg", "bd", "db", "zp", "pv", "pf", "sr",
];

/// Returns `size` pairwise distinct, capitalized random labels.
///
/// Each label starts from 2 or 3 random syllables; while it collides with
/// an earlier label one more syllable is appended.
///
/// # Example
/// ```
/// use phylogen::labels::random_labels;
/// use phylogen::rng::{RngSession, Seed};
///
/// let mut rng = RngSession::seeded(&Seed::from("labels"));
/// let labels = random_labels(5, &mut rng);
/// assert_eq!(labels.len(), 5);
/// assert!(labels.iter().all(|l| l.chars().next().unwrap().is_uppercase()));
/// ```
pub fn random_labels(size: usize, rng: &mut RngSession) -> Vec<String> {
    let mut labels = Vec::with_capacity(size);
    let mut seen = HashSet::with_capacity(size);

    for _ in 0..size {
        let mut label = clean_label(&syllables(2, 3, rng).concat(), rng);
        while seen.contains(&label) {
            let extended = format!("{label}{}", syllable(rng));
            label = clean_label(&extended, rng);
        }
        seen.insert(label.clone());
        labels.push(label);
    }

    labels
}

/// Draws between `min` and `max` (inclusive) random syllables.
fn syllables(min: usize, max: usize, rng: &mut RngSession) -> Vec<String> {
    let count = min + rng.index(max - min + 1);
    (0..count).map(|_| syllable(rng)).collect()
}

/// Draws a single syllable following a random pattern.
fn syllable(rng: &mut RngSession) -> String {
    let pattern = *rng.choose(&PATTERNS);
    pattern
        .chars()
        .map(|class| match class {
            'C' => *rng.choose(&CONSONANTS),
            _ => *rng.choose(&VOWELS),
        })
        .collect()
}

/// Makes a raw label more readable and capitalizes it.
///
/// Lowercases; removes `hh` and any `h` next to a consonant; reduces complex
/// clusters to one random sound; collapses doubled vowels; turns an initial
/// `i` into `wi`.
pub(crate) fn clean_label(label: &str, rng: &mut RngSession) -> String {
    let mut label = label.to_lowercase().replace("hh", "");

    for cons in CONSONANTS {
        label = label.replace(&format!("{cons}h"), &cons.to_string());
        label = label.replace(&format!("h{cons}"), &cons.to_string());
    }

    for cluster in COMPLEX_CLUSTERS {
        if label.contains(cluster) {
            let sounds: Vec<char> = cluster.chars().collect();
            let kept = rng.choose(&sounds).to_string();
            label = label.replace(cluster, &kept);
        }
    }

    for vowel in VOWELS {
        label = label.replace(&format!("{vowel}{vowel}"), &vowel.to_string());
    }

    if label.starts_with('i') {
        label.insert(0, 'w');
    }

    capitalize(&label)
}

/// Uppercases the first character and lowercases the rest.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
