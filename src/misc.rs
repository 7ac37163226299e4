use hashbrown::HashMap;

pub trait Similarity {
    fn similarity(&self, other: &Self) -> f64;
}

impl<T: AsRef<str>> Similarity for T {
    fn similarity(&self, other: &Self) -> f64 {
        similarity(self.as_ref(), other.as_ref())
    }
}

/// Dice coefficient of the character bigrams of two strings, ignoring spaces.
/// Returns a value from 0 (nothing in common) to 1 (equal).
pub fn similarity(str1: &str, str2: &str) -> f64 {
    let a = str1.chars().filter(|x| *x != ' ').collect::<Vec<_>>();
    let b = str2.chars().filter(|x| *x != ' ').collect::<Vec<_>>();

    // Check some simple cases
    if a == b {
        return 1.0;
    }

    if a.len() < 2 || b.len() < 2 {
        return 0.0;
    }

    let mut first_bigrams = HashMap::<(char, char), i32>::new();
    for i in a.windows(2) {
        *first_bigrams.entry((i[0], i[1])).or_insert(0) += 1;
    }

    let mut intersection_size = 0;
    for i in b.windows(2) {
        if let Some(count) = first_bigrams.get_mut(&(i[0], i[1])) {
            if *count > 0 {
                *count -= 1;
                intersection_size += 1;
            }
        }
    }

    (2.0 * intersection_size as f64) / (a.len() + b.len() - 2) as f64
}

#[cfg(test)]
mod test {
    use super::{similarity, Similarity};

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("speakers", "speakers"), 1.0);
        assert_eq!(similarity("night", "nacht"), 0.25);
        assert_eq!(similarity("a", "b"), 0.0);
        assert_eq!("usb audio".similarity(&"usbaudio"), 1.0);
    }

    #[test]
    fn test_similarity_picks_closest() {
        let wanted = "headphones";
        let speakers = "built-in speakers".similarity(&wanted);
        let headphones = "external headphones".similarity(&wanted);
        assert!(headphones > speakers);
    }

    #[test]
    fn test_similarity_unicode() {
        assert!(similarity("Büro Lautsprecher", "büro") > 0.0);
    }
}
