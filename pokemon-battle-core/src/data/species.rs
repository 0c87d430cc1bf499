use crate::data::types::PokemonType::{self, *};
use crate::data::normalize_id;
use crate::error::{EngineError, IdentifierKind};
use phf::phf_map;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseStats {
    pub hp: u8,
    pub atk: u8,
    pub def: u8,
    pub spa: u8,
    pub spd: u8,
    pub spe: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeciesData {
    pub id: &'static str,
    pub types: [PokemonType; 2],
    pub base_stats: BaseStats,
    pub weight_kg: f32,
}

const fn species(
    id: &'static str,
    types: [PokemonType; 2],
    stats: [u8; 6],
    weight_kg: f32,
) -> SpeciesData {
    SpeciesData {
        id,
        types,
        base_stats: BaseStats {
            hp: stats[0],
            atk: stats[1],
            def: stats[2],
            spa: stats[3],
            spd: stats[4],
            spe: stats[5],
        },
        weight_kg,
    }
}

// Ref: pokemon-showdown/data/pokedex.ts (base stats, weights).
pub static POKEDEX: phf::Map<&'static str, SpeciesData> = phf_map! {
    "alakazam" => species("alakazam", [Psychic, Typeless], [55, 50, 45, 135, 95, 120], 48.0),
    "amoonguss" => species("amoonguss", [Grass, Poison], [114, 85, 70, 85, 80, 30], 10.5),
    "azumarill" => species("azumarill", [Water, Fairy], [100, 50, 80, 60, 80, 50], 28.5),
    "blastoise" => species("blastoise", [Water, Typeless], [79, 83, 100, 85, 105, 78], 85.5),
    "blissey" => species("blissey", [Normal, Typeless], [255, 10, 10, 75, 135, 55], 46.8),
    "breloom" => species("breloom", [Grass, Fighting], [60, 130, 80, 60, 60, 70], 39.2),
    "bulbasaur" => species("bulbasaur", [Grass, Poison], [45, 49, 49, 65, 65, 45], 6.9),
    "charizard" => species("charizard", [Fire, Flying], [78, 84, 78, 109, 85, 100], 90.5),
    "charmander" => species("charmander", [Fire, Typeless], [39, 52, 43, 60, 50, 65], 8.5),
    "clefable" => species("clefable", [Fairy, Typeless], [95, 70, 73, 95, 90, 60], 40.0),
    "corviknight" => species("corviknight", [Flying, Steel], [98, 87, 105, 53, 85, 67], 75.0),
    "dragonite" => species("dragonite", [Dragon, Flying], [91, 134, 95, 100, 100, 80], 210.0),
    "dugtrio" => species("dugtrio", [Ground, Typeless], [35, 100, 50, 50, 70, 120], 33.3),
    "excadrill" => species("excadrill", [Ground, Steel], [110, 135, 60, 50, 65, 88], 40.4),
    "ferrothorn" => species("ferrothorn", [Grass, Steel], [74, 94, 131, 54, 116, 20], 110.0),
    "garchomp" => species("garchomp", [Dragon, Ground], [108, 130, 95, 80, 85, 102], 95.0),
    "gengar" => species("gengar", [Ghost, Poison], [60, 65, 60, 130, 75, 110], 40.5),
    "gyarados" => species("gyarados", [Water, Flying], [95, 125, 79, 60, 100, 81], 235.0),
    "heatran" => species("heatran", [Fire, Steel], [91, 90, 106, 130, 106, 77], 430.0),
    "hippowdon" => species("hippowdon", [Ground, Typeless], [108, 112, 118, 68, 72, 47], 300.0),
    "jellicent" => species("jellicent", [Water, Ghost], [100, 60, 70, 85, 105, 60], 135.0),
    "kingdra" => species("kingdra", [Water, Dragon], [75, 95, 95, 95, 95, 85], 152.0),
    "lucario" => species("lucario", [Fighting, Steel], [70, 110, 70, 115, 70, 90], 54.0),
    "magnezone" => species("magnezone", [Electric, Steel], [70, 70, 115, 130, 90, 60], 180.0),
    "mamoswine" => species("mamoswine", [Ice, Ground], [110, 130, 80, 70, 60, 80], 291.0),
    "metagross" => species("metagross", [Steel, Psychic], [80, 135, 130, 95, 90, 70], 550.0),
    "pikachu" => species("pikachu", [Electric, Typeless], [35, 55, 40, 50, 50, 90], 6.0),
    "raichu" => species("raichu", [Electric, Typeless], [60, 90, 55, 90, 80, 110], 30.0),
    "rattata" => species("rattata", [Normal, Typeless], [30, 56, 35, 25, 35, 72], 3.5),
    "rotomwash" => species("rotomwash", [Electric, Water], [50, 65, 107, 105, 107, 86], 0.3),
    "scizor" => species("scizor", [Bug, Steel], [70, 130, 100, 55, 80, 65], 118.0),
    "skarmory" => species("skarmory", [Steel, Flying], [65, 80, 140, 40, 70, 70], 50.5),
    "snorlax" => species("snorlax", [Normal, Typeless], [160, 110, 65, 65, 110, 30], 460.0),
    "squirtle" => species("squirtle", [Water, Typeless], [44, 48, 65, 50, 64, 43], 9.0),
    "starmie" => species("starmie", [Water, Psychic], [60, 75, 85, 100, 85, 115], 80.0),
    "swampert" => species("swampert", [Water, Ground], [100, 110, 90, 85, 90, 60], 81.9),
    "tentacruel" => species("tentacruel", [Water, Poison], [80, 70, 65, 80, 120, 100], 55.0),
    "toxapex" => species("toxapex", [Poison, Water], [50, 63, 152, 53, 142, 35], 14.5),
    "tyranitar" => species("tyranitar", [Rock, Dark], [100, 134, 110, 95, 100, 61], 202.0),
    "venusaur" => species("venusaur", [Grass, Poison], [80, 82, 83, 100, 100, 80], 100.0),
    "volcarona" => species("volcarona", [Bug, Fire], [85, 60, 65, 135, 105, 100], 46.0),
    "weavile" => species("weavile", [Dark, Ice], [70, 120, 65, 45, 85, 125], 34.0),
};

/// Resolves a species name to its Pokédex entry.
pub fn species_data(name: &str) -> Result<&'static SpeciesData, EngineError> {
    POKEDEX
        .get(normalize_id(name).as_str())
        .ok_or_else(|| EngineError::unknown(IdentifierKind::Species, name))
}
