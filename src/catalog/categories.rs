use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn category(id: &'static str, name: &'static str, description: &'static str) -> Category {
    Category {
        id,
        name,
        description,
    }
}

/// Known plugin categories, ordered by id
pub const CATEGORIES: &[Category] = &[
    category("adventure", "Adventure", "Adventure and exploration plugins"),
    category("cursed", "Cursed", "Cursed and challenge plugins"),
    category("decoration", "Decoration", "Decoration and building plugins"),
    category("economy", "Economy", "Economy and trading plugins"),
    category("equipment", "Equipment", "Equipment and gear plugins"),
    category("food", "Food", "Food and farming plugins"),
    category("game-mechanics", "Game Mechanics", "Game mechanics modification plugins"),
    category("library", "Library", "API libraries for developers"),
    category("magic", "Magic", "Magic and spells plugins"),
    category("management", "Management", "Server management plugins"),
    category("minigame", "Minigame", "Minigame plugins"),
    category("mobs", "Mobs", "Mob related plugins"),
    category("optimization", "Optimization", "Performance optimization plugins"),
    category("social", "Social", "Social and communication plugins"),
    category("storage", "Storage", "Storage and inventory plugins"),
    category("technology", "Technology", "Technology and automation plugins"),
    category("transportation", "Transportation", "Transportation plugins"),
    category("utility", "Utility", "General utility plugins"),
    category("world-generation", "World Generation", "World generation plugins"),
];

pub fn category_by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Display name of a category, or the id itself if unknown
pub fn category_name(id: &str) -> &str {
    category_by_id(id).map_or(id, |c| c.name)
}

pub fn category_ids() -> impl Iterator<Item = &'static str> {
    CATEGORIES.iter().map(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup() {
        assert_eq!(category_name("game-mechanics"), "Game Mechanics");
        assert_eq!(category_name("unlisted"), "unlisted");
        assert_eq!(category_ids().count(), 19);
        assert!(CATEGORIES.windows(2).all(|w| w[0].id < w[1].id));
    }
}
