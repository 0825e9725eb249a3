//! Levels command: print the level curve

use crate::progression::{LevelInfo, LEVELS};

pub fn levels_command(xp: Option<i64>) {
    if let Some(xp) = xp {
        let info = LevelInfo::compute(xp);
        println!(
            "{} XP -> level {} {} {}",
            xp.max(0),
            info.level,
            info.emoji,
            info.title
        );
        if info.is_max_level {
            println!("Max level reached");
        } else {
            println!(
                "{} XP to level {} ({:.0}% there)",
                info.xp_to_next_level,
                info.level + 1,
                info.progress_to_next(xp.max(0) as u64) * 100.0
            );
        }
        return;
    }

    println!("{:>5}  {:>7}  Title", "Level", "XP");
    for level in LEVELS {
        println!(
            "{:>5}  {:>7}  {} {}",
            level.level, level.xp_required, level.emoji, level.title
        );
    }
}
