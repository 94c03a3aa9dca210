//! `serde` support: a graph is a map from each key to the list of its successors.

use crate::graph::Graph;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::Formatter;
use std::hash::Hash;
use std::marker::PhantomData;

impl<T> Serialize for Graph<T>
where
    T: Serialize + Eq + Hash + Clone,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for node in self.nodes() {
            map.serialize_entry(node, self.successors(node))?;
        }
        map.end()
    }
}

struct GraphVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for GraphVisitor<T>
where
    T: Deserialize<'de> + Eq + Hash + Clone,
{
    type Value = Graph<T>;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map from node to its successors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<T, Vec<T>>()? {
            pairs.push(entry);
        }
        Ok(Graph::from_pairs(pairs))
    }
}

impl<'de, T> Deserialize<'de> for Graph<T>
where
    T: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GraphVisitor(PhantomData))
    }
}
