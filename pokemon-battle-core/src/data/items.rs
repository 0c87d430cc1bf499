use crate::data::conditions::{PokemonStatus, Weather};
use crate::error::IdentifierKind;

id_enum! {
    pub enum Item [IdentifierKind::Item] {
        NoItem => "none",
        AirBalloon => "airballoon",
        AssaultVest => "assaultvest",
        BlackSludge => "blacksludge",
        ChoiceBand => "choiceband",
        ChoiceScarf => "choicescarf",
        ChoiceSpecs => "choicespecs",
        DampRock => "damprock",
        ExpertBelt => "expertbelt",
        FlameOrb => "flameorb",
        FocusSash => "focussash",
        HeatRock => "heatrock",
        HeavyDutyBoots => "heavydutyboots",
        IcyRock => "icyrock",
        Leftovers => "leftovers",
        LifeOrb => "lifeorb",
        LightClay => "lightclay",
        LumBerry => "lumberry",
        RockyHelmet => "rockyhelmet",
        SitrusBerry => "sitrusberry",
        SmoothRock => "smoothrock",
        TerrainExtender => "terrainextender",
        ToxicOrb => "toxicorb",
    }
}

impl Item {
    pub fn is_choice_item(self) -> bool {
        matches!(self, Item::ChoiceBand | Item::ChoiceScarf | Item::ChoiceSpecs)
    }

    /// Rock items stretch the matching weather from 5 to 8 turns.
    pub fn extends_weather(self, weather: Weather) -> bool {
        matches!(
            (self, weather),
            (Item::DampRock, Weather::Rain)
                | (Item::HeatRock, Weather::Sun)
                | (Item::SmoothRock, Weather::Sand)
                | (Item::IcyRock, Weather::Hail | Weather::Snow)
        )
    }

    /// Status inflicted on the holder at the end of each turn.
    pub fn end_of_turn_status(self) -> Option<PokemonStatus> {
        match self {
            Item::FlameOrb => Some(PokemonStatus::Burn),
            Item::ToxicOrb => Some(PokemonStatus::Toxic),
            _ => None,
        }
    }
}
