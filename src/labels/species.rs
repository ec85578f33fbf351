//! Latin-looking binomial species names.

use crate::labels::textgen::{VOWELS, clean_label, random_labels};
use crate::rng::RngSession;

/// Returns `size` random species names of the form `Genus epithet`.
///
/// Twice as many pronounceable labels are drawn as needed: the first half
/// become genera, the second half epithets. Both go through a series of
/// "latinizing" rewrites before being paired. Names are not guaranteed to
/// be unique; see [`crate::labels::label_leaves`] for deduplication.
pub fn random_species(size: usize, rng: &mut RngSession) -> Vec<String> {
    let mut labels: Vec<String> = random_labels(size * 2, rng)
        .into_iter()
        .map(|label| label.to_lowercase())
        .collect();

    // "h" is a sound of its own in raw labels, not aspiration
    for label in labels.iter_mut() {
        *label = label.replace('h', "").replace('f', "ph").replace('k', "c");
    }

    for label in labels.iter_mut() {
        let ends_well = label
            .chars()
            .last()
            .is_some_and(|last| VOWELS.contains(&last) || last == 's' || last == 'r');
        if !ends_well {
            label.push(*rng.choose(&VOWELS));
            label.push_str(*rng.choose(&["s", ""]));
        }
    }

    for label in labels.iter_mut() {
        if label.ends_with('u') || label.ends_with('e') {
            label.push('s');
        }
    }

    for label in labels.iter_mut() {
        if label.ends_with('i') && rng.uniform() <= 0.75 {
            label.push('s');
        }
    }
    for label in labels.iter_mut() {
        if label.ends_with('i') {
            label.push('i');
        }
    }

    for label in labels.iter_mut() {
        if label.ends_with('a') && rng.uniform() <= 0.5 {
            label.push('s');
        }
    }

    // Aspirated plosives before vowels
    for plosive in ['t', 'p'] {
        for vowel in VOWELS {
            let source = format!("{plosive}{vowel}");
            let target = format!("{plosive}h{vowel}");
            for label in labels.iter_mut() {
                if rng.uniform() <= 0.5 {
                    *label = label.replace(&source, &target);
                }
            }
        }
    }

    for label in labels.iter_mut() {
        if label.starts_with('p') || label.starts_with('b') {
            label.insert(0, 's');
        }
    }

    // Geminate intervocalic consonants
    for cons in "bpdtsrlgmn".chars() {
        for first in VOWELS {
            for second in VOWELS {
                let source = format!("{first}{cons}{second}");
                let target = format!("{first}{cons}{cons}{second}");
                for label in labels.iter_mut() {
                    if rng.uniform() < 0.4 {
                        *label = label.replace(&source, &target);
                    }
                }
            }
        }
    }

    for label in labels.iter_mut() {
        if label.chars().count() < 5 {
            label.push(*rng.choose(&['r', 'r', 'l']));
            label.push(*rng.choose(&VOWELS));
            label.push('s');
        }
    }

    let epithets = labels.split_off(size);
    labels
        .iter()
        .zip(epithets.iter())
        .map(|(genus, epithet)| {
            let genus = clean_label(genus, rng);
            let epithet = clean_label(epithet, rng).to_lowercase();
            format!("{genus} {epithet}")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Seed;

    #[test]
    fn test_species_shape() {
        let mut rng = RngSession::seeded(&Seed::from("species"));
        let names = random_species(40, &mut rng);
        assert_eq!(names.len(), 40);
        for name in names {
            let (genus, epithet) = name.split_once(' ').unwrap();
            assert!(genus.chars().next().unwrap().is_uppercase());
            assert!(epithet.chars().all(|c| c.is_lowercase()));
        }
    }

    #[test]
    fn test_species_latin_endings() {
        let mut rng = RngSession::seeded(&Seed::from("endings"));
        let names = random_species(100, &mut rng);
        let with_s = names.iter().filter(|name| name.ends_with('s')).count();
        assert!(with_s > 0);
        assert!(with_s < names.len());
    }

    #[test]
    fn test_species_deterministic() {
        let a = random_species(10, &mut RngSession::seeded(&Seed::from(9u64)));
        let b = random_species(10, &mut RngSession::seeded(&Seed::from(9u64)));
        assert_eq!(a, b);
    }
}
