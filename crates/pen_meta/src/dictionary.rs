//! The meta dictionary, one ordered map per manipulation category.

use crate::manipulation::{
    AtchEntry, AtchIdentifier, EqdpEntry, EqdpIdentifier, EqpEntry, EqpIdentifier, EstEntry,
    EstIdentifier, GlobalEqpManipulation, GmpEntry, GmpIdentifier, ImcEntry, ImcIdentifier,
    Manipulation, MetaCategory, MetaEntry, MetaIdentifier, MetaManipulation, RspEntry,
    RspIdentifier,
};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A set of meta manipulations keyed by identifier.
///
/// Each category keeps its own insertion-ordered map. Inserting an identifier
/// that is already present replaces its entry in place (last write wins) and
/// keeps its original position. Equality compares contents only, not order.
///
/// Serializes as the manifest `Manipulations` array, categories in
/// [`MetaCategory::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaDictionary {
    global_eqp: IndexSet<GlobalEqpManipulation>,
    imc: IndexMap<ImcIdentifier, ImcEntry>,
    eqp: IndexMap<EqpIdentifier, EqpEntry>,
    eqdp: IndexMap<EqdpIdentifier, EqdpEntry>,
    est: IndexMap<EstIdentifier, EstEntry>,
    rsp: IndexMap<RspIdentifier, RspEntry>,
    gmp: IndexMap<GmpIdentifier, GmpEntry>,
    atch: IndexMap<AtchIdentifier, AtchEntry>,
}

impl MetaDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of manipulations across all categories.
    pub fn len(&self) -> usize {
        MetaCategory::ALL.iter().map(|c| self.count(*c)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of manipulations in one category.
    pub fn count(&self, category: MetaCategory) -> usize {
        match category {
            MetaCategory::GlobalEqp => self.global_eqp.len(),
            MetaCategory::Imc => self.imc.len(),
            MetaCategory::Eqp => self.eqp.len(),
            MetaCategory::Eqdp => self.eqdp.len(),
            MetaCategory::Est => self.est.len(),
            MetaCategory::Rsp => self.rsp.len(),
            MetaCategory::Gmp => self.gmp.len(),
            MetaCategory::Atch => self.atch.len(),
        }
    }

    pub fn clear(&mut self) {
        self.global_eqp.clear();
        self.imc.clear();
        self.eqp.clear();
        self.eqdp.clear();
        self.est.clear();
        self.rsp.clear();
        self.gmp.clear();
        self.atch.clear();
    }

    /// Insert a manipulation, returning the entry it replaced.
    pub fn insert(&mut self, manipulation: MetaManipulation) -> Option<MetaEntry> {
        match manipulation {
            MetaManipulation::GlobalEqp(m) => {
                (!self.global_eqp.insert(m)).then_some(MetaEntry::GlobalEqp)
            }
            MetaManipulation::Imc(m) => self.imc.insert(m.identifier, m.entry).map(MetaEntry::Imc),
            MetaManipulation::Eqp(m) => self.eqp.insert(m.identifier, m.entry).map(MetaEntry::Eqp),
            MetaManipulation::Eqdp(m) => {
                self.eqdp.insert(m.identifier, m.entry).map(MetaEntry::Eqdp)
            }
            MetaManipulation::Est(m) => self.est.insert(m.identifier, m.entry).map(MetaEntry::Est),
            MetaManipulation::Rsp(m) => self.rsp.insert(m.identifier, m.entry).map(MetaEntry::Rsp),
            MetaManipulation::Gmp(m) => self.gmp.insert(m.identifier, m.entry).map(MetaEntry::Gmp),
            MetaManipulation::Atch(m) => {
                self.atch.insert(m.identifier, m.entry).map(MetaEntry::Atch)
            }
        }
    }

    pub fn get(&self, identifier: &MetaIdentifier) -> Option<MetaEntry> {
        match identifier {
            MetaIdentifier::GlobalEqp(i) => {
                self.global_eqp.contains(i).then_some(MetaEntry::GlobalEqp)
            }
            MetaIdentifier::Imc(i) => self.imc.get(i).copied().map(MetaEntry::Imc),
            MetaIdentifier::Eqp(i) => self.eqp.get(i).copied().map(MetaEntry::Eqp),
            MetaIdentifier::Eqdp(i) => self.eqdp.get(i).copied().map(MetaEntry::Eqdp),
            MetaIdentifier::Est(i) => self.est.get(i).copied().map(MetaEntry::Est),
            MetaIdentifier::Rsp(i) => self.rsp.get(i).copied().map(MetaEntry::Rsp),
            MetaIdentifier::Gmp(i) => self.gmp.get(i).copied().map(MetaEntry::Gmp),
            MetaIdentifier::Atch(i) => self.atch.get(i).cloned().map(MetaEntry::Atch),
        }
    }

    pub fn contains(&self, identifier: &MetaIdentifier) -> bool {
        self.get(identifier).is_some()
    }

    /// Remove a manipulation, keeping the order of the remaining ones.
    pub fn remove(&mut self, identifier: &MetaIdentifier) -> Option<MetaEntry> {
        match identifier {
            MetaIdentifier::GlobalEqp(i) => {
                self.global_eqp.shift_remove(i).then_some(MetaEntry::GlobalEqp)
            }
            MetaIdentifier::Imc(i) => self.imc.shift_remove(i).map(MetaEntry::Imc),
            MetaIdentifier::Eqp(i) => self.eqp.shift_remove(i).map(MetaEntry::Eqp),
            MetaIdentifier::Eqdp(i) => self.eqdp.shift_remove(i).map(MetaEntry::Eqdp),
            MetaIdentifier::Est(i) => self.est.shift_remove(i).map(MetaEntry::Est),
            MetaIdentifier::Rsp(i) => self.rsp.shift_remove(i).map(MetaEntry::Rsp),
            MetaIdentifier::Gmp(i) => self.gmp.shift_remove(i).map(MetaEntry::Gmp),
            MetaIdentifier::Atch(i) => self.atch.shift_remove(i).map(MetaEntry::Atch),
        }
    }

    /// Insert or overwrite every manipulation of `other`. Never removes.
    pub fn merge(&mut self, other: &MetaDictionary) {
        self.global_eqp.extend(other.global_eqp.iter().copied());
        self.imc.extend(other.imc.iter().map(|(k, v)| (*k, *v)));
        self.eqp.extend(other.eqp.iter().map(|(k, v)| (*k, *v)));
        self.eqdp.extend(other.eqdp.iter().map(|(k, v)| (*k, *v)));
        self.est.extend(other.est.iter().map(|(k, v)| (*k, *v)));
        self.rsp.extend(other.rsp.iter().map(|(k, v)| (*k, *v)));
        self.gmp.extend(other.gmp.iter().map(|(k, v)| (*k, *v)));
        self.atch
            .extend(other.atch.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    pub fn global_eqp(&self) -> impl Iterator<Item = &GlobalEqpManipulation> + '_ {
        self.global_eqp.iter()
    }

    pub fn imc(&self) -> impl Iterator<Item = (&ImcIdentifier, &ImcEntry)> + '_ {
        self.imc.iter()
    }

    pub fn eqp(&self) -> impl Iterator<Item = (&EqpIdentifier, &EqpEntry)> + '_ {
        self.eqp.iter()
    }

    pub fn eqdp(&self) -> impl Iterator<Item = (&EqdpIdentifier, &EqdpEntry)> + '_ {
        self.eqdp.iter()
    }

    pub fn est(&self) -> impl Iterator<Item = (&EstIdentifier, &EstEntry)> + '_ {
        self.est.iter()
    }

    pub fn rsp(&self) -> impl Iterator<Item = (&RspIdentifier, &RspEntry)> + '_ {
        self.rsp.iter()
    }

    pub fn gmp(&self) -> impl Iterator<Item = (&GmpIdentifier, &GmpEntry)> + '_ {
        self.gmp.iter()
    }

    pub fn atch(&self) -> impl Iterator<Item = (&AtchIdentifier, &AtchEntry)> + '_ {
        self.atch.iter()
    }

    /// All manipulations, grouped by category in [`MetaCategory::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = MetaManipulation> + '_ {
        self.global_eqp
            .iter()
            .copied()
            .map(MetaManipulation::GlobalEqp)
            .chain(
                self.imc
                    .iter()
                    .map(|(i, e)| MetaManipulation::Imc(Manipulation::new(*i, *e))),
            )
            .chain(
                self.eqp
                    .iter()
                    .map(|(i, e)| MetaManipulation::Eqp(Manipulation::new(*i, *e))),
            )
            .chain(
                self.eqdp
                    .iter()
                    .map(|(i, e)| MetaManipulation::Eqdp(Manipulation::new(*i, *e))),
            )
            .chain(
                self.est
                    .iter()
                    .map(|(i, e)| MetaManipulation::Est(Manipulation::new(*i, *e))),
            )
            .chain(
                self.rsp
                    .iter()
                    .map(|(i, e)| MetaManipulation::Rsp(Manipulation::new(*i, *e))),
            )
            .chain(
                self.gmp
                    .iter()
                    .map(|(i, e)| MetaManipulation::Gmp(Manipulation::new(*i, *e))),
            )
            .chain(self.atch.iter().map(|(i, e)| {
                MetaManipulation::Atch(Manipulation::new(i.clone(), e.clone()))
            }))
    }

    /// Manipulations of a single category, in insertion order.
    pub fn iter_category(
        &self,
        category: MetaCategory,
    ) -> impl Iterator<Item = MetaManipulation> + '_ {
        self.iter().filter(move |m| m.category() == category)
    }

    /// Build a dictionary from a manifest `Manipulations` array.
    ///
    /// Records with an unknown `Type` or an unparseable payload are skipped so
    /// manifests written by newer tools still load.
    pub fn from_manifest_records(records: &[serde_json::Value]) -> Self {
        Self::partition_manifest_records(records).0
    }

    /// Like [`MetaDictionary::from_manifest_records`], but also returns the
    /// records that could not be parsed, unchanged and in their original order.
    pub fn partition_manifest_records(
        records: &[serde_json::Value],
    ) -> (Self, Vec<serde_json::Value>) {
        let mut dictionary = Self::new();
        let mut unrecognized = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match serde_json::from_value::<MetaManipulation>(record.clone()) {
                Ok(manipulation) => {
                    dictionary.insert(manipulation);
                }
                Err(e) => {
                    let tag = record
                        .get("Type")
                        .and_then(|t| t.as_str())
                        .unwrap_or("<missing>");
                    tracing::warn!(index, tag, "Unrecognized manipulation record: {}", e);
                    unrecognized.push(record.clone());
                }
            }
        }
        (dictionary, unrecognized)
    }
}

impl FromIterator<MetaManipulation> for MetaDictionary {
    fn from_iter<T: IntoIterator<Item = MetaManipulation>>(iter: T) -> Self {
        let mut dictionary = Self::new();
        dictionary.extend(iter);
        dictionary
    }
}

impl Extend<MetaManipulation> for MetaDictionary {
    fn extend<T: IntoIterator<Item = MetaManipulation>>(&mut self, iter: T) {
        for manipulation in iter {
            self.insert(manipulation);
        }
    }
}

impl Serialize for MetaDictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for MetaDictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let manipulations = Vec::<MetaManipulation>::deserialize(deserializer)?;
        Ok(manipulations.into_iter().collect())
    }
}
