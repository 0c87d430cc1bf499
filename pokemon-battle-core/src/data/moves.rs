use crate::data::conditions::{
    PokemonSideCondition, PokemonStatus, PokemonVolatileStatus, Terrain, Weather,
};
use crate::data::normalize_id;
use crate::data::types::PokemonType;
use crate::error::{EngineError, IdentifierKind};
use phf::phf_map;
use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveTarget {
    User,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    pub contact: bool,
    /// Blocked by Protect.
    pub protect: bool,
    pub powder: bool,
    pub sound: bool,
    pub punch: bool,
    pub bite: bool,
}

const NO_FLAGS: Flags = Flags {
    contact: false,
    protect: false,
    powder: false,
    sound: false,
    punch: false,
    bite: false,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatBoosts {
    pub attack: i8,
    pub defense: i8,
    pub special_attack: i8,
    pub special_defense: i8,
    pub speed: i8,
    pub accuracy: i8,
    pub evasion: i8,
}

impl StatBoosts {
    pub const NONE: StatBoosts = StatBoosts {
        attack: 0,
        defense: 0,
        special_attack: 0,
        special_defense: 0,
        speed: 0,
        accuracy: 0,
        evasion: 0,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boost {
    pub target: MoveTarget,
    pub boosts: StatBoosts,
}

/// Heal as a fraction of max HP; a negative amount costs HP instead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Heal {
    pub target: MoveTarget,
    pub amount: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusEffect {
    pub target: MoveTarget,
    pub status: PokemonStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolatileStatusEffect {
    pub target: MoveTarget,
    pub volatile_status: PokemonVolatileStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideConditionEffect {
    pub target: MoveTarget,
    pub condition: PokemonSideCondition,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SecondaryEffect {
    Status(PokemonStatus),
    VolatileStatus(PokemonVolatileStatus),
    Boost(StatBoosts),
    Heal(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Secondary {
    /// Percent chance, 0..=100.
    pub chance: f32,
    pub target: MoveTarget,
    pub effect: SecondaryEffect,
}

/// Behaviour that does not fit the declarative fields of [`MoveData`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEffect {
    None,
    /// Switches the user out after hitting (U-turn, Volt Switch).
    Pivot,
    BatonPass,
    /// Forces the target out to a random living reserve.
    Drag,
    RapidSpin,
    Defog,
    KnockOff,
    TrickRoom,
    Wish,
    Rest,
    HealBell,
    Haze,
    /// Doubles power and moves first against a switching target.
    Pursuit,
    /// Fails unless the target is about to use a damaging move.
    SuckerPunch,
    /// Damage equal to the user's level.
    LevelDamage,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveData {
    pub id: &'static str,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub base_power: f32,
    /// Percent; values above 100 never miss.
    pub accuracy: f32,
    pub priority: i8,
    pub pp: i8,
    pub high_crit: bool,
    pub flags: Flags,
    pub boost: Option<Boost>,
    pub heal: Option<Heal>,
    pub status: Option<StatusEffect>,
    pub volatile_status: Option<VolatileStatusEffect>,
    pub side_condition: Option<SideConditionEffect>,
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub secondaries: &'static [Secondary],
    pub drain: Option<f32>,
    pub recoil: Option<f32>,
    pub crash: Option<f32>,
    pub effect: MoveEffect,
}

const fn base(
    id: &'static str,
    move_type: PokemonType,
    category: MoveCategory,
    base_power: f32,
    accuracy: f32,
    pp: i8,
) -> MoveData {
    MoveData {
        id,
        move_type,
        category,
        base_power,
        accuracy,
        priority: 0,
        pp,
        high_crit: false,
        flags: Flags {
            protect: true,
            ..NO_FLAGS
        },
        boost: None,
        heal: None,
        status: None,
        volatile_status: None,
        side_condition: None,
        weather: None,
        terrain: None,
        secondaries: &[],
        drain: None,
        recoil: None,
        crash: None,
        effect: MoveEffect::None,
    }
}

const fn physical(id: &'static str, t: PokemonType, power: f32, accuracy: f32, pp: i8) -> MoveData {
    base(id, t, MoveCategory::Physical, power, accuracy, pp)
}

const fn special(id: &'static str, t: PokemonType, power: f32, accuracy: f32, pp: i8) -> MoveData {
    base(id, t, MoveCategory::Special, power, accuracy, pp)
}

/// Status move aimed at the opponent.
const fn status(id: &'static str, t: PokemonType, accuracy: f32, pp: i8) -> MoveData {
    base(id, t, MoveCategory::Status, 0.0, accuracy, pp)
}

/// Status move affecting the user, its side, or the whole field.
const fn field(id: &'static str, t: PokemonType, pp: i8) -> MoveData {
    let mut data = base(id, t, MoveCategory::Status, 0.0, 101.0, pp);
    data.flags.protect = false;
    data
}

const fn chance(chance: f32, target: MoveTarget, effect: SecondaryEffect) -> Secondary {
    Secondary {
        chance,
        target,
        effect,
    }
}

const fn drop(stat_boosts: StatBoosts) -> SecondaryEffect {
    SecondaryEffect::Boost(stat_boosts)
}

const fn atk(n: i8) -> StatBoosts {
    StatBoosts {
        attack: n,
        ..StatBoosts::NONE
    }
}

const fn def(n: i8) -> StatBoosts {
    StatBoosts {
        defense: n,
        ..StatBoosts::NONE
    }
}

const fn spa(n: i8) -> StatBoosts {
    StatBoosts {
        special_attack: n,
        ..StatBoosts::NONE
    }
}

const fn spd(n: i8) -> StatBoosts {
    StatBoosts {
        special_defense: n,
        ..StatBoosts::NONE
    }
}

const fn spe(n: i8) -> StatBoosts {
    StatBoosts {
        speed: n,
        ..StatBoosts::NONE
    }
}

const fn stats(attack: i8, defense: i8, special_attack: i8, special_defense: i8, speed: i8) -> StatBoosts {
    StatBoosts {
        attack,
        defense,
        special_attack,
        special_defense,
        speed,
        accuracy: 0,
        evasion: 0,
    }
}

impl MoveData {
    const fn priority(mut self, priority: i8) -> Self {
        self.priority = priority;
        self
    }

    const fn contact(mut self) -> Self {
        self.flags.contact = true;
        self
    }

    const fn punch(mut self) -> Self {
        self.flags.contact = true;
        self.flags.punch = true;
        self
    }

    const fn bite(mut self) -> Self {
        self.flags.contact = true;
        self.flags.bite = true;
        self
    }

    const fn sound(mut self) -> Self {
        self.flags.sound = true;
        self
    }

    const fn powder(mut self) -> Self {
        self.flags.powder = true;
        self
    }

    const fn high_crit(mut self) -> Self {
        self.high_crit = true;
        self
    }

    const fn secondaries(mut self, secondaries: &'static [Secondary]) -> Self {
        self.secondaries = secondaries;
        self
    }

    const fn boosts(mut self, target: MoveTarget, boosts: StatBoosts) -> Self {
        self.boost = Some(Boost { target, boosts });
        self
    }

    const fn heals(mut self, target: MoveTarget, amount: f32) -> Self {
        self.heal = Some(Heal { target, amount });
        self
    }

    const fn inflicts(mut self, status: PokemonStatus) -> Self {
        self.status = Some(StatusEffect {
            target: MoveTarget::Opponent,
            status,
        });
        self
    }

    const fn volatile(mut self, target: MoveTarget, volatile_status: PokemonVolatileStatus) -> Self {
        self.volatile_status = Some(VolatileStatusEffect {
            target,
            volatile_status,
        });
        self
    }

    const fn side_condition(mut self, target: MoveTarget, condition: PokemonSideCondition) -> Self {
        self.side_condition = Some(SideConditionEffect { target, condition });
        self
    }

    const fn sets_weather(mut self, weather: Weather) -> Self {
        self.weather = Some(weather);
        self
    }

    const fn sets_terrain(mut self, terrain: Terrain) -> Self {
        self.terrain = Some(terrain);
        self
    }

    const fn drain(mut self, fraction: f32) -> Self {
        self.drain = Some(fraction);
        self
    }

    const fn recoil(mut self, fraction: f32) -> Self {
        self.recoil = Some(fraction);
        self
    }

    const fn crash(mut self, fraction: f32) -> Self {
        self.crash = Some(fraction);
        self
    }

    const fn effect(mut self, effect: MoveEffect) -> Self {
        self.effect = effect;
        self
    }
}

use MoveTarget::{Opponent, User};
use PokemonStatus as S;
use PokemonType::*;
use PokemonVolatileStatus as V;
use SecondaryEffect::{Status as Inflict, VolatileStatus as Apply};

// Ref: pokemon-showdown/data/moves.ts (curated subset).
pub static MOVES: phf::Map<&'static str, MoveData> = phf_map! {
    "none" => field("none", Typeless, 0),

    // Normal
    "tackle" => physical("tackle", Normal, 40.0, 100.0, 35).contact(),
    "quickattack" => physical("quickattack", Normal, 40.0, 100.0, 30).contact().priority(1),
    "extremespeed" => physical("extremespeed", Normal, 80.0, 100.0, 5).contact().priority(2),
    "bodyslam" => physical("bodyslam", Normal, 85.0, 100.0, 15)
        .contact()
        .secondaries(&[chance(30.0, Opponent, Inflict(S::Paralyze))]),
    "doubleedge" => physical("doubleedge", Normal, 120.0, 100.0, 15).contact().recoil(0.33),
    "rapidspin" => physical("rapidspin", Normal, 50.0, 100.0, 40)
        .contact()
        .effect(MoveEffect::RapidSpin)
        .secondaries(&[chance(100.0, User, drop(spe(1)))]),
    "explosion" => physical("explosion", Normal, 250.0, 100.0, 5).heals(User, -1.0),
    "hypervoice" => special("hypervoice", Normal, 90.0, 100.0, 10).sound(),
    "growl" => status("growl", Normal, 100.0, 40).sound().boosts(Opponent, atk(-1)),
    "swordsdance" => field("swordsdance", Normal, 20).boosts(User, atk(2)),
    "shellsmash" => field("shellsmash", Normal, 15).boosts(User, stats(2, -1, 2, -1, 2)),
    "protect" => field("protect", Normal, 10).priority(4).volatile(User, V::Protect),
    "substitute" => field("substitute", Normal, 10).volatile(User, V::Substitute),
    "recover" => field("recover", Normal, 5).heals(User, 0.5),
    "softboiled" => field("softboiled", Normal, 5).heals(User, 0.5),
    "wish" => field("wish", Normal, 10).effect(MoveEffect::Wish),
    "safeguard" => field("safeguard", Normal, 25).side_condition(User, PokemonSideCondition::Safeguard),
    "batonpass" => field("batonpass", Normal, 40).effect(MoveEffect::BatonPass),
    "whirlwind" => status("whirlwind", Normal, 101.0, 20).priority(-6).effect(MoveEffect::Drag),
    "roar" => status("roar", Normal, 101.0, 20).priority(-6).sound().effect(MoveEffect::Drag),
    "healbell" => field("healbell", Normal, 5).sound().effect(MoveEffect::HealBell),
    "yawn" => status("yawn", Normal, 101.0, 10).volatile(Opponent, V::Yawn),
    "splash" => field("splash", Normal, 40),

    // Fire
    "ember" => special("ember", Fire, 40.0, 100.0, 25)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Burn))]),
    "flamethrower" => special("flamethrower", Fire, 90.0, 100.0, 15)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Burn))]),
    "fireblast" => special("fireblast", Fire, 110.0, 85.0, 5)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Burn))]),
    "overheat" => special("overheat", Fire, 130.0, 90.0, 5)
        .secondaries(&[chance(100.0, User, drop(spa(-2)))]),
    "firespin" => special("firespin", Fire, 35.0, 85.0, 15).volatile(Opponent, V::PartiallyTrapped),
    "flareblitz" => physical("flareblitz", Fire, 120.0, 100.0, 15)
        .contact()
        .recoil(0.33)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Burn))]),
    "firepunch" => physical("firepunch", Fire, 75.0, 100.0, 15)
        .punch()
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Burn))]),
    "firefang" => physical("firefang", Fire, 65.0, 95.0, 15).bite().secondaries(&[
        chance(10.0, Opponent, Inflict(S::Burn)),
        chance(10.0, Opponent, Apply(V::Flinch)),
    ]),
    "willowisp" => status("willowisp", Fire, 85.0, 15).inflicts(S::Burn),
    "sunnyday" => field("sunnyday", Fire, 5).sets_weather(Weather::Sun),

    // Water
    "watergun" => special("watergun", Water, 40.0, 100.0, 25),
    "surf" => special("surf", Water, 90.0, 100.0, 15),
    "hydropump" => special("hydropump", Water, 110.0, 80.0, 5),
    "scald" => special("scald", Water, 80.0, 100.0, 15)
        .secondaries(&[chance(30.0, Opponent, Inflict(S::Burn))]),
    "whirlpool" => special("whirlpool", Water, 35.0, 85.0, 15).volatile(Opponent, V::PartiallyTrapped),
    "aquajet" => physical("aquajet", Water, 40.0, 100.0, 20).contact().priority(1),
    "waterfall" => physical("waterfall", Water, 80.0, 100.0, 15)
        .contact()
        .secondaries(&[chance(20.0, Opponent, Apply(V::Flinch))]),
    "liquidation" => physical("liquidation", Water, 85.0, 100.0, 10)
        .contact()
        .secondaries(&[chance(20.0, Opponent, drop(def(-1)))]),
    "flipturn" => physical("flipturn", Water, 60.0, 100.0, 20).contact().effect(MoveEffect::Pivot),
    "raindance" => field("raindance", Water, 5).sets_weather(Weather::Rain),

    // Electric
    "thunderbolt" => special("thunderbolt", Electric, 90.0, 100.0, 15)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Paralyze))]),
    "thunder" => special("thunder", Electric, 110.0, 70.0, 10)
        .secondaries(&[chance(30.0, Opponent, Inflict(S::Paralyze))]),
    "voltswitch" => special("voltswitch", Electric, 70.0, 100.0, 20).effect(MoveEffect::Pivot),
    "thunderpunch" => physical("thunderpunch", Electric, 75.0, 100.0, 15)
        .punch()
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Paralyze))]),
    "thunderwave" => status("thunderwave", Electric, 90.0, 20).inflicts(S::Paralyze),
    "electricterrain" => field("electricterrain", Electric, 10).sets_terrain(Terrain::ElectricTerrain),

    // Grass
    "energyball" => special("energyball", Grass, 90.0, 100.0, 10)
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "gigadrain" => special("gigadrain", Grass, 75.0, 100.0, 10).drain(0.5),
    "leafstorm" => special("leafstorm", Grass, 130.0, 90.0, 5)
        .secondaries(&[chance(100.0, User, drop(spa(-2)))]),
    "woodhammer" => physical("woodhammer", Grass, 120.0, 100.0, 15).contact().recoil(0.33),
    "grassyglide" => physical("grassyglide", Grass, 55.0, 100.0, 20).contact(),
    "spore" => status("spore", Grass, 100.0, 15).powder().inflicts(S::Sleep),
    "sleeppowder" => status("sleeppowder", Grass, 75.0, 15).powder().inflicts(S::Sleep),
    "leechseed" => status("leechseed", Grass, 90.0, 10).volatile(Opponent, V::LeechSeed),
    "grassyterrain" => field("grassyterrain", Grass, 10).sets_terrain(Terrain::GrassyTerrain),

    // Ice
    "icebeam" => special("icebeam", Ice, 90.0, 100.0, 10)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Freeze))]),
    "blizzard" => special("blizzard", Ice, 110.0, 70.0, 5)
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Freeze))]),
    "iceshard" => physical("iceshard", Ice, 40.0, 100.0, 30).priority(1),
    "iciclecrash" => physical("iciclecrash", Ice, 85.0, 90.0, 10)
        .secondaries(&[chance(30.0, Opponent, Apply(V::Flinch))]),
    "icepunch" => physical("icepunch", Ice, 75.0, 100.0, 15)
        .punch()
        .secondaries(&[chance(10.0, Opponent, Inflict(S::Freeze))]),
    "icefang" => physical("icefang", Ice, 65.0, 95.0, 15).bite().secondaries(&[
        chance(10.0, Opponent, Inflict(S::Freeze)),
        chance(10.0, Opponent, Apply(V::Flinch)),
    ]),
    "auroraveil" => field("auroraveil", Ice, 20).side_condition(User, PokemonSideCondition::AuroraVeil),
    "hail" => field("hail", Ice, 10).sets_weather(Weather::Hail),
    "snowscape" => field("snowscape", Ice, 10).sets_weather(Weather::Snow),
    "haze" => field("haze", Ice, 30).effect(MoveEffect::Haze),

    // Fighting
    "closecombat" => physical("closecombat", Fighting, 120.0, 100.0, 5)
        .contact()
        .secondaries(&[chance(100.0, User, drop(stats(0, -1, 0, -1, 0)))]),
    "superpower" => physical("superpower", Fighting, 120.0, 100.0, 5)
        .contact()
        .secondaries(&[chance(100.0, User, drop(stats(-1, -1, 0, 0, 0)))]),
    "machpunch" => physical("machpunch", Fighting, 40.0, 100.0, 30).punch().priority(1),
    "drainpunch" => physical("drainpunch", Fighting, 75.0, 100.0, 10).punch().drain(0.5),
    "highjumpkick" => physical("highjumpkick", Fighting, 130.0, 90.0, 10).contact().crash(0.5),
    "seismictoss" => physical("seismictoss", Fighting, 1.0, 100.0, 20)
        .contact()
        .effect(MoveEffect::LevelDamage),
    "focusblast" => special("focusblast", Fighting, 120.0, 70.0, 5)
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "aurasphere" => special("aurasphere", Fighting, 80.0, 101.0, 20),
    "bulkup" => field("bulkup", Fighting, 20).boosts(User, stats(1, 1, 0, 0, 0)),

    // Poison
    "sludgebomb" => special("sludgebomb", Poison, 90.0, 100.0, 10)
        .secondaries(&[chance(30.0, Opponent, Inflict(S::Poison))]),
    "poisonjab" => physical("poisonjab", Poison, 80.0, 100.0, 20)
        .contact()
        .secondaries(&[chance(30.0, Opponent, Inflict(S::Poison))]),
    "toxic" => status("toxic", Poison, 90.0, 10).inflicts(S::Toxic),
    "toxicspikes" => field("toxicspikes", Poison, 20)
        .side_condition(Opponent, PokemonSideCondition::ToxicSpikes),

    // Ground
    "earthquake" => physical("earthquake", Ground, 100.0, 100.0, 10),
    "earthpower" => special("earthpower", Ground, 90.0, 100.0, 10)
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "spikes" => field("spikes", Ground, 20).side_condition(Opponent, PokemonSideCondition::Spikes),

    // Flying
    "bravebird" => physical("bravebird", Flying, 120.0, 100.0, 15).contact().recoil(0.33),
    "airslash" => special("airslash", Flying, 75.0, 95.0, 15)
        .secondaries(&[chance(30.0, Opponent, Apply(V::Flinch))]),
    "hurricane" => special("hurricane", Flying, 110.0, 70.0, 10)
        .secondaries(&[chance(30.0, Opponent, Apply(V::Confusion))]),
    "roost" => field("roost", Flying, 5).heals(User, 0.5).volatile(User, V::Roost),
    "tailwind" => field("tailwind", Flying, 15).side_condition(User, PokemonSideCondition::Tailwind),
    "defog" => status("defog", Flying, 101.0, 15)
        .effect(MoveEffect::Defog)
        .boosts(Opponent, StatBoosts { evasion: -1, ..StatBoosts::NONE }),

    // Psychic
    "psychic" => special("psychic", Psychic, 90.0, 100.0, 10)
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "psyshock" => special("psyshock", Psychic, 80.0, 100.0, 10),
    "calmmind" => field("calmmind", Psychic, 20).boosts(User, stats(0, 0, 1, 1, 0)),
    "agility" => field("agility", Psychic, 30).boosts(User, spe(2)),
    "hypnosis" => status("hypnosis", Psychic, 60.0, 20).inflicts(S::Sleep),
    "reflect" => field("reflect", Psychic, 20).side_condition(User, PokemonSideCondition::Reflect),
    "lightscreen" => field("lightscreen", Psychic, 30)
        .side_condition(User, PokemonSideCondition::LightScreen),
    "trickroom" => field("trickroom", Psychic, 5).priority(-7).effect(MoveEffect::TrickRoom),
    "rest" => field("rest", Psychic, 5).effect(MoveEffect::Rest),
    "psychicterrain" => field("psychicterrain", Psychic, 10).sets_terrain(Terrain::PsychicTerrain),

    // Bug
    "uturn" => physical("uturn", Bug, 70.0, 100.0, 20).contact().effect(MoveEffect::Pivot),
    "xscissor" => physical("xscissor", Bug, 80.0, 100.0, 15).contact(),
    "bugbuzz" => special("bugbuzz", Bug, 90.0, 100.0, 10)
        .sound()
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "stickyweb" => field("stickyweb", Bug, 20).side_condition(Opponent, PokemonSideCondition::StickyWeb),

    // Rock
    "stoneedge" => physical("stoneedge", Rock, 100.0, 80.0, 5).high_crit(),
    "rockslide" => physical("rockslide", Rock, 75.0, 90.0, 10)
        .secondaries(&[chance(30.0, Opponent, Apply(V::Flinch))]),
    "saltcure" => physical("saltcure", Rock, 40.0, 100.0, 15).volatile(Opponent, V::SaltCure),
    "stealthrock" => field("stealthrock", Rock, 20)
        .side_condition(Opponent, PokemonSideCondition::Stealthrock),
    "sandstorm" => field("sandstorm", Rock, 10).sets_weather(Weather::Sand),

    // Ghost
    "shadowball" => special("shadowball", Ghost, 80.0, 100.0, 15)
        .secondaries(&[chance(20.0, Opponent, drop(spd(-1)))]),
    "shadowsneak" => physical("shadowsneak", Ghost, 40.0, 100.0, 30).contact().priority(1),
    "nightshade" => special("nightshade", Ghost, 1.0, 100.0, 15).effect(MoveEffect::LevelDamage),
    "confuseray" => status("confuseray", Ghost, 100.0, 10).volatile(Opponent, V::Confusion),

    // Dragon
    "dragonclaw" => physical("dragonclaw", Dragon, 80.0, 100.0, 15).contact(),
    "dragontail" => physical("dragontail", Dragon, 60.0, 90.0, 10)
        .contact()
        .priority(-6)
        .effect(MoveEffect::Drag),
    "dracometeor" => special("dracometeor", Dragon, 130.0, 90.0, 5)
        .secondaries(&[chance(100.0, User, drop(spa(-2)))]),
    "dragondance" => field("dragondance", Dragon, 20).boosts(User, stats(1, 0, 0, 0, 1)),

    // Dark
    "crunch" => physical("crunch", Dark, 80.0, 100.0, 15)
        .bite()
        .secondaries(&[chance(20.0, Opponent, drop(def(-1)))]),
    "knockoff" => physical("knockoff", Dark, 65.0, 100.0, 20).contact().effect(MoveEffect::KnockOff),
    "suckerpunch" => physical("suckerpunch", Dark, 70.0, 100.0, 5)
        .contact()
        .priority(1)
        .effect(MoveEffect::SuckerPunch),
    "pursuit" => physical("pursuit", Dark, 40.0, 100.0, 20).contact().effect(MoveEffect::Pursuit),
    "darkpulse" => special("darkpulse", Dark, 80.0, 100.0, 15)
        .secondaries(&[chance(20.0, Opponent, Apply(V::Flinch))]),
    "nastyplot" => field("nastyplot", Dark, 20).boosts(User, spa(2)),
    "taunt" => status("taunt", Dark, 100.0, 20).volatile(Opponent, V::Taunt),

    // Steel
    "ironhead" => physical("ironhead", Steel, 80.0, 100.0, 15)
        .contact()
        .secondaries(&[chance(30.0, Opponent, Apply(V::Flinch))]),
    "bulletpunch" => physical("bulletpunch", Steel, 40.0, 100.0, 30).punch().priority(1),
    "flashcannon" => special("flashcannon", Steel, 80.0, 100.0, 10)
        .secondaries(&[chance(10.0, Opponent, drop(spd(-1)))]),
    "irondefense" => field("irondefense", Steel, 15).boosts(User, def(2)),

    // Fairy
    "moonblast" => special("moonblast", Fairy, 95.0, 100.0, 15)
        .secondaries(&[chance(30.0, Opponent, drop(spa(-1)))]),
    "dazzlinggleam" => special("dazzlinggleam", Fairy, 80.0, 100.0, 10),
    "charm" => status("charm", Fairy, 100.0, 20).boosts(Opponent, atk(-2)),
    "mistyterrain" => field("mistyterrain", Fairy, 10).sets_terrain(Terrain::MistyTerrain),
};

/// Interned handle to an entry of [`MOVES`].
#[derive(Clone, Copy)]
pub struct MoveId(&'static MoveData);

impl MoveId {
    pub fn from_id(raw: &str) -> Result<Self, EngineError> {
        MOVES
            .get(normalize_id(raw).as_str())
            .map(MoveId)
            .ok_or_else(|| EngineError::unknown(IdentifierKind::Move, raw))
    }

    /// The empty move slot.
    pub fn none() -> Self {
        MoveId(&NONE_MOVE)
    }

    pub fn data(self) -> &'static MoveData {
        self.0
    }

    pub fn as_str(self) -> &'static str {
        self.0.id
    }

    pub fn is_none(self) -> bool {
        self.0.id == NONE_MOVE.id
    }
}

static NONE_MOVE: MoveData = field("none", PokemonType::Typeless, 0);

impl PartialEq for MoveId {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for MoveId {}

impl Hash for MoveId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveId({})", self.0.id)
    }
}

impl fmt::Display for MoveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.id)
    }
}

impl Serialize for MoveId {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.serialize_str(self.0.id)
    }
}
