use serde::Serialize;

/// An entry in the built-in allergen catalog offered to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommonAllergen {
    pub id: &'static str,
    pub name: &'static str,
    /// Other names the allergen commonly appears under on labels.
    pub aliases: &'static [&'static str],
}

pub const COMMON_ALLERGENS: &[CommonAllergen] = &[
    CommonAllergen {
        id: "1",
        name: "Milk",
        aliases: &["dairy", "lactose", "casein", "whey", "butter", "cheese", "cream"],
    },
    CommonAllergen {
        id: "2",
        name: "Egg",
        aliases: &["eggs", "albumin", "mayonnaise", "meringue"],
    },
    CommonAllergen {
        id: "3",
        name: "Peanut",
        aliases: &["peanuts", "groundnut", "arachis"],
    },
    CommonAllergen {
        id: "4",
        name: "Soy",
        aliases: &["soya", "soybean", "tofu", "edamame", "miso", "tempeh"],
    },
    CommonAllergen {
        id: "5",
        name: "Wheat",
        aliases: &["gluten", "flour", "bread", "semolina", "durum", "spelt"],
    },
    CommonAllergen {
        id: "6",
        name: "Tree Nuts",
        aliases: &["almond", "cashew", "walnut", "pecan", "pistachio", "hazelnut", "macadamia"],
    },
    CommonAllergen {
        id: "7",
        name: "Shellfish",
        aliases: &["shrimp", "crab", "lobster", "prawn", "crayfish", "scallop"],
    },
    CommonAllergen {
        id: "8",
        name: "Fish",
        aliases: &["salmon", "tuna", "cod", "anchovy", "tilapia"],
    },
    CommonAllergen {
        id: "9",
        name: "Sesame",
        aliases: &["tahini", "sesame oil", "sesame seeds"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: HashSet<_> = COMMON_ALLERGENS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), COMMON_ALLERGENS.len());
    }

    #[test]
    fn test_catalog_has_major_allergens() {
        let names: Vec<_> = COMMON_ALLERGENS.iter().map(|a| a.name).collect();
        assert!(names.contains(&"Peanut"));
        assert!(names.contains(&"Sesame"));
        assert_eq!(names.len(), 9);
    }
}
