use crate::data::conditions::{PokemonStatus, Terrain, Weather};
use crate::data::types::PokemonType;
use crate::error::IdentifierKind;

id_enum! {
    pub enum Ability [IdentifierKind::Ability] {
        NoAbility => "none",
        Adaptability => "adaptability",
        AirLock => "airlock",
        Blaze => "blaze",
        Chlorophyll => "chlorophyll",
        ClearBody => "clearbody",
        CloudNine => "cloudnine",
        Drizzle => "drizzle",
        Drought => "drought",
        ElectricSurge => "electricsurge",
        GrassySurge => "grassysurge",
        Guts => "guts",
        HugePower => "hugepower",
        Infiltrator => "infiltrator",
        Insomnia => "insomnia",
        Intimidate => "intimidate",
        IronBarbs => "ironbarbs",
        Levitate => "levitate",
        Limber => "limber",
        MagicGuard => "magicguard",
        MistySurge => "mistysurge",
        Multiscale => "multiscale",
        NaturalCure => "naturalcure",
        Overgrow => "overgrow",
        PoisonHeal => "poisonheal",
        Prankster => "prankster",
        PsychicSurge => "psychicsurge",
        PurePower => "purepower",
        Regenerator => "regenerator",
        RoughSkin => "roughskin",
        SandRush => "sandrush",
        SandStream => "sandstream",
        Scrappy => "scrappy",
        SereneGrace => "serenegrace",
        ShieldDust => "shielddust",
        SlushRush => "slushrush",
        SnowWarning => "snowwarning",
        SpeedBoost => "speedboost",
        Sturdy => "sturdy",
        SwiftSwim => "swiftswim",
        Technician => "technician",
        ThickFat => "thickfat",
        Torrent => "torrent",
        Unaware => "unaware",
        VitalSpirit => "vitalspirit",
        VoltAbsorb => "voltabsorb",
        WaterAbsorb => "waterabsorb",
        WaterVeil => "waterveil",
    }
}

impl Ability {
    /// Weather summoned when the holder enters the field.
    pub fn weather_on_entry(self) -> Option<Weather> {
        match self {
            Ability::Drizzle => Some(Weather::Rain),
            Ability::Drought => Some(Weather::Sun),
            Ability::SandStream => Some(Weather::Sand),
            Ability::SnowWarning => Some(Weather::Snow),
            _ => None,
        }
    }

    pub fn terrain_on_entry(self) -> Option<Terrain> {
        match self {
            Ability::ElectricSurge => Some(Terrain::ElectricTerrain),
            Ability::GrassySurge => Some(Terrain::GrassyTerrain),
            Ability::MistySurge => Some(Terrain::MistyTerrain),
            Ability::PsychicSurge => Some(Terrain::PsychicTerrain),
            _ => None,
        }
    }

    /// Speed doubling granted by the active weather.
    pub fn doubles_speed_in(self, weather: Weather) -> bool {
        matches!(
            (self, weather),
            (Ability::SwiftSwim, Weather::Rain | Weather::HeavyRain)
                | (Ability::Chlorophyll, Weather::Sun | Weather::HarshSun)
                | (Ability::SandRush, Weather::Sand)
                | (Ability::SlushRush, Weather::Hail | Weather::Snow)
        )
    }

    pub fn blocks_status(self, status: PokemonStatus) -> bool {
        matches!(
            (self, status),
            (Ability::Limber, PokemonStatus::Paralyze)
                | (Ability::Insomnia | Ability::VitalSpirit, PokemonStatus::Sleep)
                | (Ability::WaterVeil, PokemonStatus::Burn)
        )
    }

    /// Pinch abilities boost moves of one type by 1.5x at or below 1/3 HP.
    pub fn pinch_type(self) -> Option<PokemonType> {
        match self {
            Ability::Blaze => Some(PokemonType::Fire),
            Ability::Torrent => Some(PokemonType::Water),
            Ability::Overgrow => Some(PokemonType::Grass),
            _ => None,
        }
    }

    /// A type the holder absorbs for a quarter of its max HP instead of taking damage.
    pub fn absorbs_type(self) -> Option<PokemonType> {
        match self {
            Ability::WaterAbsorb => Some(PokemonType::Water),
            Ability::VoltAbsorb => Some(PokemonType::Electric),
            _ => None,
        }
    }

    pub fn suppresses_weather(self) -> bool {
        matches!(self, Ability::CloudNine | Ability::AirLock)
    }
}
