//! Concept catalog: the immutable base snapshot of one closing.
//!
//! A catalog is built once per load (from the server, or locally from the
//! header row of an uploaded sheet) and is only replaced wholesale by a
//! refresh. The single sanctioned in-place mutation is the commit fold
//! writing `server_category`.

use rustc_hash::FxHashMap;

use crate::category::Category;
use crate::concept::{Concept, ConceptKey, Suggestion, SuggestionRecord};
use crate::error::EngineError;

/// Snapshot of every concept on a closing, in sheet order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    concepts: Vec<Concept>,
    index: FxHashMap<ConceptKey, usize>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from pre-keyed concepts.
    ///
    /// Rejects duplicate keys: the snapshot is an identity map and a repeated
    /// key would make every downstream lookup ambiguous.
    pub fn new(concepts: Vec<Concept>) -> Result<Self, EngineError> {
        let mut index = FxHashMap::default();
        for (i, concept) in concepts.iter().enumerate() {
            if index.insert(concept.key.clone(), i).is_some() {
                return Err(EngineError::DuplicateConcept(concept.key.clone()));
            }
        }
        Ok(Self { concepts, index })
    }

    /// Build a catalog from raw header text in reading order.
    ///
    /// Occurrence ordinals count repeats of the same trimmed header, starting
    /// at 1; every member of a repeated header is flagged `is_duplicate`.
    /// Blank cells are skipped.
    pub fn from_display_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: FxHashMap<String, u32> = FxHashMap::default();
        let mut concepts: Vec<Concept> = Vec::new();

        for name in names {
            let display_name: String = name.into();
            let header = display_name.trim().to_string();
            if header.is_empty() {
                log::debug!("skipping blank header cell");
                continue;
            }

            let ordinal = seen.entry(header.clone()).or_insert(0);
            *ordinal += 1;
            concepts.push(Concept::new(
                ConceptKey::new(header, *ordinal),
                display_name,
            ));
        }

        for concept in &mut concepts {
            let count = seen.get(&concept.key.header).copied().unwrap_or(1);
            concept.is_duplicate = count > 1;
        }

        let index = concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key.clone(), i))
            .collect();

        Self { concepts, index }
    }

    /// Merge a suggestion feed into the catalog by key.
    ///
    /// Records for keys outside the snapshot are skipped. Returns the number
    /// of concepts that received a suggestion.
    pub fn merge_suggestions(&mut self, records: Vec<SuggestionRecord>) -> usize {
        let mut merged = 0;
        for record in records {
            match self.index.get(&record.key) {
                Some(&i) => {
                    self.concepts[i].suggestion = Some(Suggestion {
                        category: record.category,
                        frequency: record.frequency,
                    });
                    merged += 1;
                }
                None => {
                    log::debug!("suggestion for unknown concept {}, skipped", record.key);
                }
            }
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains_key(&self, key: &ConceptKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &ConceptKey) -> Option<&Concept> {
        self.index.get(key).map(|&i| &self.concepts[i])
    }

    /// Concepts in sheet order.
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// Keys in sheet order.
    pub fn keys(&self) -> impl Iterator<Item = &ConceptKey> {
        self.concepts.iter().map(|c| &c.key)
    }

    /// Fold a committed category into the base snapshot.
    /// Returns false when the key is no longer present.
    pub(crate) fn set_server_category(&mut self, key: &ConceptKey, category: Category) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.concepts[i].server_category = Some(category);
                true
            }
            None => false,
        }
    }
}

/// Extract the header row from CSV data of an uploaded sheet.
///
/// Cells are returned raw (untrimmed, blanks included) so that
/// `Catalog::from_display_names` sees the sheet exactly as uploaded.
pub fn headers_from_csv(csv_data: &str) -> Result<Vec<String>, EngineError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| EngineError::HeaderParse(e.to_string()))?;

    Ok(headers.iter().map(|h| h.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_for_repeated_headers() {
        let catalog =
            Catalog::from_display_names(vec!["Salary", "Bonus", "Bonus", "Overtime", "Bonus"]);

        assert_eq!(catalog.len(), 5);
        let keys: Vec<&ConceptKey> = catalog.keys().collect();
        assert_eq!(*keys[0], ConceptKey::new("Salary", 1));
        assert_eq!(*keys[1], ConceptKey::new("Bonus", 1));
        assert_eq!(*keys[2], ConceptKey::new("Bonus", 2));
        assert_eq!(*keys[3], ConceptKey::new("Overtime", 1));
        assert_eq!(*keys[4], ConceptKey::new("Bonus", 3));
    }

    #[test]
    fn test_duplicate_flag() {
        let catalog = Catalog::from_display_names(vec!["Salary", "Bonus", "Bonus"]);

        let salary = catalog.get(&ConceptKey::new("Salary", 1)).unwrap();
        assert!(!salary.is_duplicate);

        for ordinal in 1..=2 {
            let bonus = catalog.get(&ConceptKey::new("Bonus", ordinal)).unwrap();
            assert!(bonus.is_duplicate, "Bonus#{ordinal} should be flagged");
        }
    }

    #[test]
    fn test_blank_and_whitespace_headers_skipped() {
        let catalog = Catalog::from_display_names(vec!["Salary", "", "   ", "Bonus"]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains_key(&ConceptKey::new("Bonus", 1)));
    }

    #[test]
    fn test_header_trimmed_for_identity_display_kept_raw() {
        let catalog = Catalog::from_display_names(vec!["  Net Pay "]);
        let concept = catalog.get(&ConceptKey::new("Net Pay", 1)).unwrap();
        assert_eq!(concept.display_name, "  Net Pay ");
    }

    #[test]
    fn test_trimmed_headers_share_ordinals() {
        let catalog = Catalog::from_display_names(vec!["Bonus", " Bonus "]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains_key(&ConceptKey::new("Bonus", 1)));
        assert!(catalog.contains_key(&ConceptKey::new("Bonus", 2)));
    }

    #[test]
    fn test_new_rejects_duplicate_keys() {
        let concepts = vec![
            Concept::new(ConceptKey::new("Bonus", 1), "Bonus"),
            Concept::new(ConceptKey::new("Bonus", 1), "Bonus"),
        ];
        let err = Catalog::new(concepts).unwrap_err();
        assert_eq!(err, EngineError::DuplicateConcept(ConceptKey::new("Bonus", 1)));
    }

    #[test]
    fn test_merge_suggestions() {
        let mut catalog = Catalog::from_display_names(vec!["Salary", "Bonus"]);

        let merged = catalog.merge_suggestions(vec![
            SuggestionRecord {
                key: ConceptKey::new("Bonus", 1),
                category: Category::TaxableEarning,
                frequency: 12,
            },
            SuggestionRecord {
                key: ConceptKey::new("Vanished", 1),
                category: Category::Ignore,
                frequency: 1,
            },
        ]);

        assert_eq!(merged, 1);
        let bonus = catalog.get(&ConceptKey::new("Bonus", 1)).unwrap();
        assert_eq!(
            bonus.suggestion,
            Some(Suggestion {
                category: Category::TaxableEarning,
                frequency: 12,
            })
        );
        assert!(catalog
            .get(&ConceptKey::new("Salary", 1))
            .unwrap()
            .suggestion
            .is_none());
    }

    #[test]
    fn test_headers_from_csv() {
        let csv = "\
Employee ID,Salary,Bonus,Bonus
1001,5000,200,100
1002,5200,0,0
";
        let headers = headers_from_csv(csv).unwrap();
        assert_eq!(headers, vec!["Employee ID", "Salary", "Bonus", "Bonus"]);

        let catalog = Catalog::from_display_names(headers);
        assert_eq!(catalog.len(), 4);
        assert!(catalog.contains_key(&ConceptKey::new("Bonus", 2)));
    }

    #[test]
    fn test_set_server_category() {
        let mut catalog = Catalog::from_display_names(vec!["Salary"]);
        let key = ConceptKey::new("Salary", 1);

        assert!(catalog.set_server_category(&key, Category::TaxableEarning));
        assert_eq!(
            catalog.get(&key).unwrap().server_category,
            Some(Category::TaxableEarning)
        );

        assert!(!catalog.set_server_category(&ConceptKey::new("Gone", 1), Category::Ignore));
    }
}
