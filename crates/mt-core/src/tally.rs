//! Insertion-ordered label counts, serialized as a JSON object.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    /// Starts every key in `keys` at zero, keeping their order.
    pub fn seeded<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: keys.into_iter().map(|k| (k.into(), 0)).collect(),
        }
    }

    /// Adds one to `key`, appending it if it was never seen.
    pub fn increment(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First key holding the highest count.
    pub fn first_max(&self) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;
        for (key, count) in self.iter() {
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((key, count)),
            }
        }
        best.map(|(key, _)| key)
    }

    /// The `n` highest counts, descending. Equal counts keep insertion order.
    pub fn top(&self, n: usize) -> Tally {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        Tally { entries }
    }
}

impl Serialize for Tally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tally {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TallyVisitor;

        impl<'de> Visitor<'de> for TallyVisitor {
            type Value = Tally;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of label to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Tally, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, count)) = access.next_entry::<String, usize>()? {
                    entries.push((key, count));
                }
                Ok(Tally { entries })
            }
        }

        deserializer.deserialize_map(TallyVisitor)
    }
}
