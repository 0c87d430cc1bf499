use crate::error::IdentifierKind;

id_enum! {
    /// Non-volatile status; at most one per Pokémon and kept on switch-out.
    pub enum PokemonStatus [IdentifierKind::Status] {
        None => "none",
        Burn => "burn",
        Sleep => "sleep",
        Freeze => "freeze",
        Paralyze => "paralyze",
        Poison => "poison",
        Toxic => "toxic",
    }
}

id_enum! {
    /// Conditions tied to the active Pokémon of a side, cleared on switch-out.
    pub enum PokemonVolatileStatus [IdentifierKind::VolatileStatus] {
        Confusion => "confusion",
        Flinch => "flinch",
        LeechSeed => "leechseed",
        PartiallyTrapped => "partiallytrapped",
        Protect => "protect",
        Roost => "roost",
        SaltCure => "saltcure",
        Substitute => "substitute",
        Taunt => "taunt",
        Yawn => "yawn",
    }
}

impl PokemonVolatileStatus {
    /// Volatiles carried over to the replacement by Baton Pass.
    pub fn survives_baton_pass(self) -> bool {
        matches!(
            self,
            PokemonVolatileStatus::Confusion
                | PokemonVolatileStatus::LeechSeed
                | PokemonVolatileStatus::Substitute
        )
    }
}

id_enum! {
    pub enum PokemonSideCondition [IdentifierKind::SideCondition] {
        AuroraVeil => "auroraveil",
        HealingWish => "healingwish",
        LightScreen => "lightscreen",
        Mist => "mist",
        Protect => "protect",
        Reflect => "reflect",
        Safeguard => "safeguard",
        Spikes => "spikes",
        Stealthrock => "stealthrock",
        StickyWeb => "stickyweb",
        Tailwind => "tailwind",
        ToxicCount => "toxiccount",
        ToxicSpikes => "toxicspikes",
    }
}

impl PokemonSideCondition {
    /// Hazards stack in layers up to this count; timed conditions report 1.
    pub fn max_layers(self) -> i8 {
        match self {
            PokemonSideCondition::Spikes => 3,
            PokemonSideCondition::ToxicSpikes => 2,
            _ => 1,
        }
    }
}

id_enum! {
    pub enum PokemonBoostableStat [IdentifierKind::Stat] {
        Attack => "attack",
        Defense => "defense",
        SpecialAttack => "specialattack",
        SpecialDefense => "specialdefense",
        Speed => "speed",
        Accuracy => "accuracy",
        Evasion => "evasion",
    }
}

id_enum! {
    pub enum Weather [IdentifierKind::Weather] {
        None => "none",
        Sun => "sun",
        Rain => "rain",
        Sand => "sand",
        Hail => "hail",
        Snow => "snow",
        HarshSun => "harshsun",
        HeavyRain => "heavyrain",
    }
}

id_enum! {
    pub enum Terrain [IdentifierKind::Terrain] {
        None => "none",
        ElectricTerrain => "electricterrain",
        GrassyTerrain => "grassyterrain",
        MistyTerrain => "mistyterrain",
        PsychicTerrain => "psychicterrain",
    }
}
