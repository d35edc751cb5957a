//! Built-in challenge presets.
//!
//! The default catalog shipped with the application. User-defined catalog
//! files can overlay these (same id wins).

use super::model::{ChallengeDefinition, ChallengeKind, Difficulty, KeyArguments};
use once_cell::sync::Lazy;

static BUILTIN: Lazy<Vec<ChallengeDefinition>> = Lazy::new(|| {
    vec![
        ChallengeDefinition {
            id: "daily-argument".to_string(),
            title: "Daily Argument Builder".to_string(),
            description: "Construct a compelling argument using the PEEL framework".to_string(),
            difficulty: Difficulty::Medium,
            points: 50,
            time_limit_secs: 300,
            kind: ChallengeKind::Argument,
            prompt: "Build an argument for: 'Schools should start later in the day to improve student performance'".to_string(),
            motion: "This house believes that schools should start later in the day".to_string(),
            key_arguments: KeyArguments {
                supporting: vec![
                    "Later start times align with teenage circadian rhythms, improving sleep quality".to_string(),
                    "Better sleep leads to improved academic performance and concentration".to_string(),
                    "Reduced tardiness and absenteeism when school schedules match natural sleep patterns".to_string(),
                ],
                opposing: vec![
                    "Later start times conflict with parents' work schedules and childcare needs".to_string(),
                    "After-school activities and sports would be pushed to very late hours".to_string(),
                    "Transportation costs would increase with staggered school schedules".to_string(),
                ],
            },
        },
        ChallengeDefinition {
            id: "fallacy-hunter".to_string(),
            title: "Fallacy Hunter".to_string(),
            description: "Identify and explain logical fallacies in given statements".to_string(),
            difficulty: Difficulty::Hard,
            points: 75,
            time_limit_secs: 240,
            kind: ChallengeKind::Fallacy,
            prompt: "Identify the fallacy: 'Everyone I know loves this restaurant, so it must be the best in the city.'".to_string(),
            motion: "This statement contains a logical fallacy".to_string(),
            key_arguments: KeyArguments {
                supporting: vec![
                    "This is an example of hasty generalization fallacy".to_string(),
                    "Small sample size cannot represent the entire population".to_string(),
                    "Personal experience doesn't equal objective quality measurement".to_string(),
                ],
                opposing: vec![
                    "Personal recommendations can be valuable indicators of quality".to_string(),
                    "Word-of-mouth is a legitimate form of social proof".to_string(),
                    "Individual experiences, while limited, still provide useful data points".to_string(),
                ],
            },
        },
        ChallengeDefinition {
            id: "quick-rebuttal".to_string(),
            title: "Quick Rebuttal Challenge".to_string(),
            description: "Respond to an opponent's argument using the DARE method".to_string(),
            difficulty: Difficulty::Easy,
            points: 25,
            time_limit_secs: 180,
            kind: ChallengeKind::Rebuttal,
            prompt: "Rebut this argument: 'Video games should be banned because they cause violence in children.'".to_string(),
            motion: "This house would ban violent video games for children".to_string(),
            key_arguments: KeyArguments {
                supporting: vec![
                    "Exposure to violent content can desensitize children to real violence".to_string(),
                    "Some studies suggest correlation between violent games and aggressive behavior".to_string(),
                    "Children may struggle to distinguish between virtual and real consequences".to_string(),
                ],
                opposing: vec![
                    "Multiple studies show no causal link between games and real-world violence".to_string(),
                    "Video games can improve problem-solving skills and hand-eye coordination".to_string(),
                    "Parental guidance and age ratings already provide adequate protection".to_string(),
                ],
            },
        },
        ChallengeDefinition {
            id: "motion-analysis".to_string(),
            title: "Motion Analysis Master".to_string(),
            description: "Analyze a complex debate motion and identify key clash areas".to_string(),
            difficulty: Difficulty::Hard,
            points: 100,
            time_limit_secs: 420,
            kind: ChallengeKind::Analysis,
            prompt: "Analyze: 'This House believes that developed nations should accept unlimited climate refugees'".to_string(),
            motion: "This House believes that developed nations should accept unlimited climate refugees".to_string(),
            key_arguments: KeyArguments {
                supporting: vec![
                    "Developed nations have historical responsibility for climate change".to_string(),
                    "Moral obligation to help those displaced by environmental disasters".to_string(),
                    "Economic benefits from increased immigration and workforce diversity".to_string(),
                ],
                opposing: vec![
                    "Unlimited immigration could strain public services and infrastructure".to_string(),
                    "Need for controlled immigration to maintain social cohesion".to_string(),
                    "Other solutions like climate adaptation funding may be more effective".to_string(),
                ],
            },
        },
    ]
});

/// Returns the built-in challenge catalog.
pub fn builtin_challenges() -> &'static [ChallengeDefinition] {
    &BUILTIN
}
