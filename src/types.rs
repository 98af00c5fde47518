//src/types.rs

/// An annotated genome: the full nucleotide sequence plus its features.
/// Loaded once and only ever borrowed by the resolver.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    pub sequence: Vec<u8>,
    pub features: Vec<Feature>,
}

/// One annotated region of the genome (CDS, gene, rRNA, ...).
#[derive(Debug, Clone)]
pub struct Feature {
    pub kind: String,
    pub qualifiers: Qualifiers,
    pub location: Location,
}

impl Feature {
    pub fn new(kind: impl Into<String>, qualifiers: Qualifiers, location: Location) -> Self {
        Self {
            kind: kind.into(),
            qualifiers,
            location,
        }
    }

    /// The first `locus_tag` value, if the feature has one.
    pub fn locus_tag(&self) -> Option<&str> {
        self.qualifiers.first("locus_tag")
    }

    /// CDS features carry protein-level annotation (`protein_id`, `db_xref`).
    pub fn is_coding(&self) -> bool {
        self.kind.contains("CDS")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// 0-based, end-exclusive bounds of a feature.
/// The strand is recorded but never used when slicing the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub strand: Strand,
}

impl Location {
    pub fn new(start: usize, end: usize, strand: Strand) -> Self {
        Self { start, end, strand }
    }

    pub fn forward(start: usize, end: usize) -> Self {
        Self::new(start, end, Strand::Forward)
    }
}

/// Qualifier name -> ordered list of values, in first-seen key order.
#[derive(Debug, Clone, Default)]
pub struct Qualifiers {
    entries: Vec<(String, Vec<String>)>,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `key`, creating the key if it is new.
    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.to_string(), vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of distinct qualifier keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first value of every qualifier, in key order.
    pub fn first_values(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter_map(|(_, values)| values.first().map(String::as_str))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Qualifiers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut qualifiers = Qualifiers::new();
        for (key, value) in iter {
            qualifiers.push(key.as_ref(), value);
        }
        qualifiers
    }
}

/// The outcome of matching one request: the feature and its locus tag.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFeature<'g> {
    pub locus: &'g str,
    pub feature: &'g Feature,
}

/// A single FASTA record ready for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub locus_tag: String,
    pub protein_id: Option<String>,
    pub gi_number: Option<String>,
    pub product: Option<String>,
    pub sequence: String,
}
