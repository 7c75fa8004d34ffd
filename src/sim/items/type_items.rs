use crate::sim::types::ElementType;
use phf::{phf_map, phf_set};

static PLATES: phf::Map<&'static str, ElementType> = phf_map! {
    "flame-plate" => ElementType::Fire,
    "splash-plate" => ElementType::Water,
    "zap-plate" => ElementType::Electric,
    "meadow-plate" => ElementType::Grass,
    "icicle-plate" => ElementType::Ice,
    "fist-plate" => ElementType::Fighting,
    "toxic-plate" => ElementType::Poison,
    "earth-plate" => ElementType::Ground,
    "sky-plate" => ElementType::Flying,
    "mind-plate" => ElementType::Psychic,
    "insect-plate" => ElementType::Bug,
    "stone-plate" => ElementType::Rock,
    "spooky-plate" => ElementType::Ghost,
    "draco-plate" => ElementType::Dragon,
    "dread-plate" => ElementType::Dark,
    "iron-plate" => ElementType::Steel,
    "pixie-plate" => ElementType::Fairy,
};

static MEMORIES: phf::Map<&'static str, ElementType> = phf_map! {
    "fire-memory" => ElementType::Fire,
    "water-memory" => ElementType::Water,
    "electric-memory" => ElementType::Electric,
    "grass-memory" => ElementType::Grass,
    "ice-memory" => ElementType::Ice,
    "fighting-memory" => ElementType::Fighting,
    "poison-memory" => ElementType::Poison,
    "ground-memory" => ElementType::Ground,
    "flying-memory" => ElementType::Flying,
    "psychic-memory" => ElementType::Psychic,
    "bug-memory" => ElementType::Bug,
    "rock-memory" => ElementType::Rock,
    "ghost-memory" => ElementType::Ghost,
    "dragon-memory" => ElementType::Dragon,
    "dark-memory" => ElementType::Dark,
    "steel-memory" => ElementType::Steel,
    "fairy-memory" => ElementType::Fairy,
};

static MEGA_STONES: phf::Set<&'static str> = phf_set! {
    "abomasite", "absolite", "aerodactylite", "aggronite", "alakazite", "altarianite",
    "ampharosite", "audinite", "banettite", "beedrillite", "blastoisinite", "blazikenite",
    "cameruptite", "charizardite-x", "charizardite-y", "diancite", "galladite", "garchompite",
    "gardevoirite", "gengarite", "glalitite", "gyaradosite", "heracronite", "houndoominite",
    "kangaskhanite", "latiasite", "latiosite", "lopunnite", "lucarionite", "manectite",
    "mawilite", "medichamite", "metagrossite", "mewtwonite-x", "mewtwonite-y", "pidgeotite",
    "pinsirite", "sablenite", "salamencite", "sceptilite", "scizorite", "sharpedonite",
    "slowbronite", "steelixite", "swampertite", "tyranitarite", "venusaurite",
};

/// Type Judgment takes on while the holder carries `item`.
pub fn plate_type(item: &str) -> Option<ElementType> {
    PLATES.get(item).copied()
}

/// Type Multi-Attack takes on while the holder carries `item`.
pub fn memory_type(item: &str) -> Option<ElementType> {
    MEMORIES.get(item).copied()
}

pub fn is_mega_stone(item: &str) -> bool {
    MEGA_STONES.contains(item)
}

/// Items bound to their holder's species that can't be knocked off, stolen or swapped.
pub fn is_bound_item(item: &str) -> bool {
    is_mega_stone(item)
        || PLATES.contains_key(item)
        || MEMORIES.contains_key(item)
        || matches!(item, "red-orb" | "blue-orb" | "rusted-sword" | "rusted-shield")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plates_and_memories_map_to_types() {
        assert_eq!(plate_type("flame-plate"), Some(ElementType::Fire));
        assert_eq!(plate_type("pixie-plate"), Some(ElementType::Fairy));
        assert_eq!(memory_type("ghost-memory"), Some(ElementType::Ghost));
        assert_eq!(plate_type("leftovers"), None);
        assert_eq!(memory_type("flame-plate"), None);
    }

    #[test]
    fn bound_items_cover_stones_plates_and_memories() {
        assert!(is_mega_stone("charizardite-x"));
        assert!(is_bound_item("zap-plate"));
        assert!(is_bound_item("dragon-memory"));
        assert!(is_bound_item("red-orb"));
        assert!(!is_bound_item("sitrus-berry"));
    }
}
