use crate::types::report::{Badge, SkillLevel};

pub fn skill_level(overall: u8) -> SkillLevel {
    match overall {
        s if s > 90 => SkillLevel::Expert,
        s if s > 75 => SkillLevel::Advanced,
        s if s > 50 => SkillLevel::Intermediate,
        s if s > 25 => SkillLevel::Beginner,
        _ => SkillLevel::Novice,
    }
}

pub fn badge(overall: u8) -> Badge {
    match overall {
        s if s > 80 => Badge::Trophy,
        s if s > 60 => Badge::Silver,
        s if s > 40 => Badge::Bronze,
        _ => Badge::Seedling,
    }
}
