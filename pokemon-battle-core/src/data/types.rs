use crate::error::IdentifierKind;

id_enum! {
    pub enum PokemonType [IdentifierKind::Type] {
        Normal => "normal",
        Fire => "fire",
        Water => "water",
        Electric => "electric",
        Grass => "grass",
        Ice => "ice",
        Fighting => "fighting",
        Poison => "poison",
        Ground => "ground",
        Flying => "flying",
        Psychic => "psychic",
        Bug => "bug",
        Rock => "rock",
        Ghost => "ghost",
        Dragon => "dragon",
        Dark => "dark",
        Steel => "steel",
        Fairy => "fairy",
        Typeless => "typeless",
    }
}

// Ref: pokemon-showdown/data/typechart.ts (multipliers only).
pub fn single_type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
    use PokemonType::*;
    if attacking == Typeless || defending == Typeless {
        return 1.0;
    }
    match attacking {
        Normal => match defending {
            Rock | Steel => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => 0.5,
            Grass | Ice | Bug | Steel => 2.0,
            _ => 1.0,
        },
        Water => match defending {
            Water | Grass | Dragon => 0.5,
            Fire | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Electric => match defending {
            Electric | Grass | Dragon => 0.5,
            Water | Flying => 2.0,
            Ground => 0.0,
            _ => 1.0,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => 0.5,
            Water | Ground | Rock => 2.0,
            _ => 1.0,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => 0.5,
            Grass | Ground | Flying | Dragon => 2.0,
            _ => 1.0,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => 2.0,
            Poison | Flying | Psychic | Bug | Fairy => 0.5,
            Ghost => 0.0,
            _ => 1.0,
        },
        Poison => match defending {
            Grass | Fairy => 2.0,
            Poison | Ground | Rock | Ghost => 0.5,
            Steel => 0.0,
            _ => 1.0,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => 2.0,
            Grass | Bug => 0.5,
            Flying => 0.0,
            _ => 1.0,
        },
        Flying => match defending {
            Grass | Fighting | Bug => 2.0,
            Electric | Rock | Steel => 0.5,
            _ => 1.0,
        },
        Psychic => match defending {
            Fighting | Poison => 2.0,
            Psychic | Steel => 0.5,
            Dark => 0.0,
            _ => 1.0,
        },
        Bug => match defending {
            Grass | Psychic | Dark => 2.0,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => 0.5,
            _ => 1.0,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => 2.0,
            Fighting | Ground | Steel => 0.5,
            _ => 1.0,
        },
        Ghost => match defending {
            Ghost | Psychic => 2.0,
            Dark => 0.5,
            Normal => 0.0,
            _ => 1.0,
        },
        Dragon => match defending {
            Dragon => 2.0,
            Steel => 0.5,
            Fairy => 0.0,
            _ => 1.0,
        },
        Dark => match defending {
            Psychic | Ghost => 2.0,
            Fighting | Dark | Fairy => 0.5,
            _ => 1.0,
        },
        Steel => match defending {
            Rock | Ice | Fairy => 2.0,
            Fire | Water | Electric | Steel => 0.5,
            _ => 1.0,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => 2.0,
            Fire | Poison | Steel => 0.5,
            _ => 1.0,
        },
        Typeless => 1.0,
    }
}

/// Combined multiplier against a (possibly single-typed) defender.
pub fn type_effectiveness(attacking: PokemonType, defending: (PokemonType, PokemonType)) -> f32 {
    if defending.0 == defending.1 {
        return single_type_effectiveness(attacking, defending.0);
    }
    single_type_effectiveness(attacking, defending.0) * single_type_effectiveness(attacking, defending.1)
}
