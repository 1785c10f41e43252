//! Static tutorial course catalog.

use std::fmt;
use std::str::FromStr;

/// Difficulty tier of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => f.write_str("Beginner"),
            Self::Intermediate => f.write_str("Intermediate"),
            Self::Advanced => f.write_str("Advanced"),
        }
    }
}

impl FromStr for CourseLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(()),
        }
    }
}

/// One tutorial course of the static catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Course {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub level: CourseLevel,
    pub lessons: u32,
}

/// The course catalog, in page order.
pub const COURSES: &[Course] = &[
    Course {
        id: "deriv-basics",
        title: "Introduction to Deriv Trading",
        description: "Learn the fundamentals of deriv trading, understand different markets, and master basic trading concepts.",
        level: CourseLevel::Beginner,
        lessons: 12,
    },
    Course {
        id: "technical-analysis",
        title: "Technical Analysis Mastery",
        description: "Master chart patterns, indicators, and technical analysis tools for better trading decisions.",
        level: CourseLevel::Intermediate,
        lessons: 18,
    },
    Course {
        id: "risk-management",
        title: "Risk Management Essentials",
        description: "Learn essential risk management techniques to protect your capital and maximize profits.",
        level: CourseLevel::Beginner,
        lessons: 8,
    },
    Course {
        id: "bot-building",
        title: "Automated Trading Bots",
        description: "Build and deploy automated trading strategies using our visual bot builder.",
        level: CourseLevel::Advanced,
        lessons: 15,
    },
    Course {
        id: "trading-psychology",
        title: "Trading Psychology",
        description: "Master the mental aspects of trading and develop emotional discipline.",
        level: CourseLevel::Intermediate,
        lessons: 10,
    },
    Course {
        id: "advanced-strategies",
        title: "Advanced Strategies",
        description: "Explore complex trading strategies used by professional traders.",
        level: CourseLevel::Advanced,
        lessons: 20,
    },
];

/// Look up a course by id.
pub fn course(id: &str) -> Option<&'static Course> {
    COURSES.iter().find(|course| course.id == id)
}
