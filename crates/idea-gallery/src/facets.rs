/// Category facets derived from the loaded idea collection.
///
/// The list always starts with the `"All"` sentinel carrying the total idea count, followed by
/// every distinct category label in first-seen order. A label's count is the number of ideas
/// containing it; an idea listing the same label twice counts once.
use std::collections::HashMap;

use ideas_common::model::{CategoryFacet, Idea, ALL_CATEGORIES};

pub fn derive_facets(ideas: &[Idea]) -> Vec<CategoryFacet> {
    let mut facets = vec![CategoryFacet {
        name: ALL_CATEGORIES.to_string(),
        count: ideas.len(),
    }];
    let mut index: HashMap<&str, usize> = HashMap::new();

    for idea in ideas {
        for (i, label) in idea.category.iter().enumerate() {
            if idea.category[..i].contains(label) {
                continue;
            }
            match index.get(label.as_str()) {
                Some(&pos) => facets[pos].count += 1,
                None => {
                    index.insert(label.as_str(), facets.len());
                    facets.push(CategoryFacet {
                        name: label.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    facets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(id: &str, categories: &[&str]) -> Idea {
        Idea {
            id: id.to_string(),
            title: format!("Idea {id}"),
            description: String::new(),
            category: categories.iter().map(|c| c.to_string()).collect(),
            prize: 0.0,
            difficulty: "Easy".to_string(),
        }
    }

    #[test]
    fn test_empty_collection_has_only_all() {
        let facets = derive_facets(&[]);
        assert_eq!(
            facets,
            vec![CategoryFacet {
                name: "All".to_string(),
                count: 0
            }]
        );
    }

    #[test]
    fn test_first_seen_order_and_counts() {
        let ideas = vec![
            idea("1", &["Web", "AI"]),
            idea("2", &["AI"]),
            idea("3", &[]),
            idea("4", &["Hardware", "Web"]),
        ];
        let facets = derive_facets(&ideas);
        let pairs: Vec<(&str, usize)> = facets.iter().map(|f| (f.name.as_str(), f.count)).collect();
        assert_eq!(
            pairs,
            vec![("All", 4), ("Web", 2), ("AI", 2), ("Hardware", 1)]
        );
    }

    #[test]
    fn test_counts_match_ideas_containing_label() {
        let ideas = vec![
            idea("1", &["AI", "AI"]),
            idea("2", &["AI", "Games"]),
            idea("3", &["Games"]),
        ];
        let facets = derive_facets(&ideas);
        for facet in &facets[1..] {
            let expected = ideas.iter().filter(|i| i.has_category(&facet.name)).count();
            assert_eq!(facet.count, expected, "facet {}", facet.name);
        }
        assert_eq!(facets[0].count, ideas.len());
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let facets = derive_facets(&[idea("1", &["ai"]), idea("2", &["AI"])]);
        assert_eq!(facets.len(), 3);
    }
}
