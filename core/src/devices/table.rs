use crate::prelude::{SecurityError, SecurityResult};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::str::FromStr;

/// Closed identifier set for a family of simulated devices.
pub trait DeviceKey: Copy + Eq + FromStr<Err = SecurityError> + 'static {
    /// Noun used in error messages ("door", "camera").
    const KIND: &'static str;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or_default()
    }

    fn parse_key(value: &str) -> SecurityResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| SecurityError::InvalidKey {
                kind: Self::KIND,
                key: value.to_string(),
            })
    }
}

/// Fixed-size table holding one value per device identifier.
///
/// Every identifier in `K::ALL` always has a slot, so lookups never miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTable<K, V> {
    slots: Vec<V>,
    _key: PhantomData<K>,
}

impl<K: DeviceKey, V: Clone> DeviceTable<K, V> {
    pub fn from_fn(mut init: impl FnMut(K) -> V) -> Self {
        Self {
            slots: K::ALL.iter().map(|key| init(*key)).collect(),
            _key: PhantomData,
        }
    }

    /// Builds a table from string-keyed entries, requiring exactly the fixed
    /// identifier set.
    pub fn from_entries(entries: &BTreeMap<String, V>) -> SecurityResult<Self> {
        let mut slots: Vec<Option<V>> = vec![None; K::ALL.len()];
        for (name, value) in entries {
            let key = K::parse_key(name)?;
            slots[key.position()] = Some(value.clone());
        }

        let mut resolved = Vec::with_capacity(slots.len());
        for (key, slot) in K::ALL.iter().zip(slots) {
            match slot {
                Some(value) => resolved.push(value),
                None => {
                    return Err(SecurityError::MissingKey {
                        kind: K::KIND,
                        key: key.as_str(),
                    })
                }
            }
        }

        Ok(Self {
            slots: resolved,
            _key: PhantomData,
        })
    }

    pub fn get(&self, key: K) -> &V {
        &self.slots[key.position()]
    }

    /// Stores `value` and hands back the previous one.
    pub fn replace(&mut self, key: K, value: V) -> V {
        std::mem::replace(&mut self.slots[key.position()], value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        K::ALL.iter().copied().zip(self.slots.iter())
    }
}
