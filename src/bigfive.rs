//! The Big-Five trait enumeration and a fixed per-trait map.
//!
//! Every score, label and classifier head in the crate is keyed by [`Trait`]
//! through [`TraitMap`], which always holds exactly one value per trait in
//! the canonical order: openness, conscientiousness, extraversion,
//! agreeableness, neuroticism.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// One of the five personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    /// All traits in canonical (label column) order.
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    /// Position of this trait in [`Trait::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, also used as the dataset column name.
    pub fn name(self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
        }
    }

    /// Short Indonesian description used in chat reports.
    pub fn description(self) -> &'static str {
        match self {
            Trait::Openness => "Terbuka pada pengalaman baru",
            Trait::Conscientiousness => "Teliti & Disiplin",
            Trait::Extraversion => "Ekstrovert",
            Trait::Agreeableness => "Mudah bergaul & ramah",
            Trait::Neuroticism => "Mudah cemas",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Trait {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Trait::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown trait: {}", s))
    }
}

/// A value for every trait, stored in [`Trait::ALL`] order.
///
/// Serializes as a JSON object keyed by trait name.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraitMap<T>([T; 5]);

impl<T> TraitMap<T> {
    /// Build a map by evaluating `f` once per trait, in canonical order.
    pub fn from_fn(mut f: impl FnMut(Trait) -> T) -> Self {
        TraitMap(Trait::ALL.map(&mut f))
    }

    pub fn get(&self, t: Trait) -> &T {
        &self.0[t.index()]
    }

    /// Iterate `(trait, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, &T)> {
        Trait::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T; 5] {
        &self.0
    }

    pub fn map<U>(&self, mut f: impl FnMut(Trait, &T) -> U) -> TraitMap<U> {
        TraitMap::from_fn(|t| f(t, &self.0[t.index()]))
    }
}

impl<T: Clone> TraitMap<T> {
    pub fn splat(value: T) -> Self {
        TraitMap::from_fn(|_| value.clone())
    }
}

impl<T> From<[T; 5]> for TraitMap<T> {
    fn from(values: [T; 5]) -> Self {
        TraitMap(values)
    }
}

impl<T> Index<Trait> for TraitMap<T> {
    type Output = T;

    fn index(&self, t: Trait) -> &T {
        &self.0[t.index()]
    }
}

impl<T> IndexMut<Trait> for TraitMap<T> {
    fn index_mut(&mut self, t: Trait) -> &mut T {
        &mut self.0[t.index()]
    }
}

impl<T: Serialize> Serialize for TraitMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for (t, value) in self.iter() {
            map.serialize_entry(t.name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TraitMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut entries: HashMap<Trait, T> = HashMap::deserialize(deserializer)?;
        let mut take = |t: Trait| {
            entries
                .remove(&t)
                .ok_or_else(|| de::Error::missing_field(t.name()))
        };
        Ok(TraitMap([
            take(Trait::Openness)?,
            take(Trait::Conscientiousness)?,
            take(Trait::Extraversion)?,
            take(Trait::Agreeableness)?,
            take(Trait::Neuroticism)?,
        ]))
    }
}

impl<T: fmt::Display> fmt::Display for TraitMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(t, v)| format!("{}: {}", t.name(), v))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
