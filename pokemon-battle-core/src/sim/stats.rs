use crate::data::species::BaseStats;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

/// Index order matches the EV and IV arrays.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Nature {
    /// The stat raised by 10% and the stat lowered by 10%, `None` for the
    /// neutral natures.
    pub fn raised_and_lowered(self) -> Option<(Stat, Stat)> {
        use Stat::*;
        let pair = match self {
            Nature::Hardy | Nature::Docile | Nature::Serious | Nature::Bashful | Nature::Quirky => {
                return None
            }
            Nature::Lonely => (Attack, Defense),
            Nature::Brave => (Attack, Speed),
            Nature::Adamant => (Attack, SpecialAttack),
            Nature::Naughty => (Attack, SpecialDefense),
            Nature::Bold => (Defense, Attack),
            Nature::Relaxed => (Defense, Speed),
            Nature::Impish => (Defense, SpecialAttack),
            Nature::Lax => (Defense, SpecialDefense),
            Nature::Timid => (Speed, Attack),
            Nature::Hasty => (Speed, Defense),
            Nature::Jolly => (Speed, SpecialAttack),
            Nature::Naive => (Speed, SpecialDefense),
            Nature::Modest => (SpecialAttack, Attack),
            Nature::Mild => (SpecialAttack, Defense),
            Nature::Quiet => (SpecialAttack, Speed),
            Nature::Rash => (SpecialAttack, SpecialDefense),
            Nature::Calm => (SpecialDefense, Attack),
            Nature::Gentle => (SpecialDefense, Defense),
            Nature::Sassy => (SpecialDefense, Speed),
            Nature::Careful => (SpecialDefense, SpecialAttack),
        };
        Some(pair)
    }

    fn apply(self, stat: Stat, value: i32) -> i32 {
        match self.raised_and_lowered() {
            Some((raised, _)) if raised == stat => value * 11 / 10,
            Some((_, lowered)) if lowered == stat => value * 9 / 10,
            _ => value,
        }
    }
}

/// Battle stats of a built Pokémon, in the units `Pokemon` stores them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatsSet {
    pub hp: i16,
    pub attack: i16,
    pub defense: i16,
    pub special_attack: i16,
    pub special_defense: i16,
    pub speed: i16,
}

impl StatsSet {
    pub fn from_base(base: &BaseStats, level: u8, evs: [u8; 6], ivs: [u8; 6], nature: Nature) -> Self {
        let level = i32::from(level);
        let scaled = |stat: Stat, base: u8| {
            let index = stat as usize;
            (2 * i32::from(base) + i32::from(ivs[index]) + i32::from(evs[index]) / 4) * level / 100
        };
        let other = |stat: Stat, base: u8| nature.apply(stat, scaled(stat, base) + 5) as i16;
        StatsSet {
            hp: (scaled(Stat::Hp, base.hp) + level + 10) as i16,
            attack: other(Stat::Attack, base.atk),
            defense: other(Stat::Defense, base.def),
            special_attack: other(Stat::SpecialAttack, base.spa),
            special_defense: other(Stat::SpecialDefense, base.spd),
            speed: other(Stat::Speed, base.spe),
        }
    }
}

/// Multiplier for an attack/defense/speed stage in [-6, 6].
pub fn stage_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(-6, 6) as f32;
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Accuracy and evasion stages use a base of 3.
pub fn accuracy_stage_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(-6, 6) as f32;
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}
