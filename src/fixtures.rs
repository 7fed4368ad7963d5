//! Random values for generated records.

use std::ops::RangeInclusive;

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};

const ADJECTIVES: &[&str] = &[
    "Small", "Ergonomic", "Rustic", "Intelligent", "Gorgeous", "Incredible", "Fantastic",
    "Practical", "Sleek", "Awesome", "Generic", "Handcrafted", "Handmade", "Licensed",
    "Refined", "Unbranded", "Tasty",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen", "Bronze", "Marble",
];

const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants",
    "Shirt", "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish", "Cheese",
    "Bacon", "Pizza", "Salad", "Sausages", "Chips",
];

/// Supplies every random value a seed run consumes.
///
/// Implementations decide distribution; callers only rely on values staying
/// inside the requested ranges.
pub trait FixtureSource: Send {
    /// Lower-cased email address.
    fn email(&mut self) -> String;
    fn full_name(&mut self) -> String;
    fn product_name(&mut self) -> String;
    fn product_description(&mut self) -> String;
    /// One sentence of filler text.
    fn sentence(&mut self) -> String;
    fn image_url(&mut self) -> String;
    /// Integer in `range`, both ends included.
    fn int(&mut self, range: RangeInclusive<i32>) -> i32;
    /// `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
    /// Index into a collection of `len` elements. `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
    /// `amount` distinct indices into a collection of `len` elements.
    fn sample(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// [`FixtureSource`] backed by the `fake` crate and a `rand` generator.
#[derive(Debug, Clone)]
pub struct FakerSource<R = StdRng> {
    rng: R,
}

impl FakerSource<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible source: the same seed yields the same values.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FakerSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick(&mut self, words: &[&'static str]) -> &'static str {
        words.choose(&mut self.rng).copied().unwrap_or_default()
    }
}

impl<R: Rng + Send> FixtureSource for FakerSource<R> {
    fn email(&mut self) -> String {
        let email: String = SafeEmail().fake_with_rng(&mut self.rng);
        email.to_lowercase()
    }

    fn full_name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    fn product_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(ADJECTIVES),
            self.pick(MATERIALS),
            self.pick(PRODUCTS)
        )
    }

    fn product_description(&mut self) -> String {
        let first: String = Sentence(6..12).fake_with_rng(&mut self.rng);
        let second: String = Sentence(6..12).fake_with_rng(&mut self.rng);
        format!("{first} {second}")
    }

    fn sentence(&mut self) -> String {
        Sentence(4..10).fake_with_rng(&mut self.rng)
    }

    fn image_url(&mut self) -> String {
        let token: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(10)
            .map(char::from)
            .collect();
        format!("https://picsum.photos/seed/{token}/640/480")
    }

    fn int(&mut self, range: RangeInclusive<i32>) -> i32 {
        if range.is_empty() {
            return *range.start();
        }
        self.rng.gen_range(range)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn sample(&mut self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut self.rng, len, amount.min(len)).into_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn emails_are_lower_case() {
        let mut source = FakerSource::seeded(7);
        for _ in 0..50 {
            let email = source.email();
            assert_eq!(email, email.to_lowercase());
            assert!(email.contains('@'), "not an email: {email}");
        }
    }

    #[test]
    fn ints_stay_in_range() {
        let mut source = FakerSource::seeded(11);
        for _ in 0..500 {
            let value = source.int(1..=3);
            assert!((1..=3).contains(&value));
        }
        assert_eq!(source.int(4..=4), 4);
    }

    #[test]
    fn sample_draws_distinct_indices() {
        let mut source = FakerSource::seeded(3);
        for amount in 0..=8 {
            let picked = source.sample(5, amount);
            assert_eq!(picked.len(), amount.min(5));
            let unique: HashSet<_> = picked.iter().copied().collect();
            assert_eq!(unique.len(), picked.len());
            assert!(picked.iter().all(|i| *i < 5));
        }
    }

    #[test]
    fn chance_honours_certain_outcomes() {
        let mut source = FakerSource::seeded(5);
        assert!((0..100).all(|_| !source.chance(0.0)));
        assert!((0..100).all(|_| source.chance(1.0)));
    }

    #[test]
    fn same_seed_gives_same_values() {
        let mut a = FakerSource::seeded(42);
        let mut b = FakerSource::seeded(42);
        assert_eq!(a.email(), b.email());
        assert_eq!(a.full_name(), b.full_name());
        assert_eq!(a.product_name(), b.product_name());
        assert_eq!(a.image_url(), b.image_url());
        assert_eq!(a.int(0..=200), b.int(0..=200));
    }

    #[test]
    fn product_names_have_three_words() {
        let mut source = FakerSource::seeded(9);
        let name = source.product_name();
        assert_eq!(name.split(' ').count(), 3, "{name}");
    }
}
