//! Pathway catalog: the ordered pathway → compounds mapping ORA runs against.
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

/// Missing-value sentinel left behind when absent identifiers are coerced to strings
pub const MISSING_SENTINEL: &str = "nan";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pathway {
    pub id: String,
    pub name: String,
    pub compounds: Vec<String>,
}

impl Pathway {
    /// Pathway whose display name is its identifier
    pub fn new(id: impl Into<String>, compounds: Vec<String>) -> Pathway {
        let id = id.into();
        Pathway {
            name: id.clone(),
            id,
            compounds,
        }
    }

    pub fn with_name(
        id: impl Into<String>,
        name: impl Into<String>,
        compounds: Vec<String>,
    ) -> Pathway {
        Pathway {
            id: id.into(),
            name: name.into(),
            compounds,
        }
    }

    /// Unique compounds of the pathway with [`MISSING_SENTINEL`] entries removed,
    /// in first-seen order.
    pub fn sanitized(&self) -> Vec<&str> {
        let mut seen: AHashSet<&str> = AHashSet::default();
        self.compounds
            .iter()
            .map(String::as_str)
            .filter(|x| *x != MISSING_SENTINEL)
            .filter(|x| seen.insert(*x))
            .collect()
    }
}

/// Pathways in caller-determined order, unique by id.
#[derive(Debug, Clone, Default)]
pub struct PathwayCatalog {
    pathways: Vec<Pathway>,
    index: AHashMap<String, usize>,
}

impl PathwayCatalog {
    pub fn new() -> PathwayCatalog {
        PathwayCatalog::default()
    }

    /// Adds a pathway. A pathway whose id is already present replaces the old
    /// entry but keeps its position.
    pub fn insert(&mut self, pathway: Pathway) {
        match self.index.get(&pathway.id) {
            Some(&i) => self.pathways[i] = pathway,
            None => {
                self.index.insert(pathway.id.clone(), self.pathways.len());
                self.pathways.push(pathway);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Pathway> {
        self.index.get(id).map(|&i| &self.pathways[i])
    }

    pub fn pathways(&self) -> &[Pathway] {
        &self.pathways
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pathway> {
        self.pathways.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.pathways.iter().map(|x| x.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }
}

impl FromIterator<Pathway> for PathwayCatalog {
    fn from_iter<T: IntoIterator<Item = Pathway>>(iter: T) -> Self {
        let mut catalog = PathwayCatalog::new();
        for pathway in iter {
            catalog.insert(pathway);
        }
        catalog
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for PathwayCatalog {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(id, compounds)| Pathway::new(id, compounds))
            .collect()
    }
}

impl<'a> IntoIterator for &'a PathwayCatalog {
    type Item = &'a Pathway;
    type IntoIter = std::slice::Iter<'a, Pathway>;

    fn into_iter(self) -> Self::IntoIter {
        self.pathways.iter()
    }
}
