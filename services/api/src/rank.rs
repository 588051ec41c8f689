use clap::Args;
use opportunity_match::config::AppConfig;
use opportunity_match::error::AppError;
use opportunity_match::matching::snapshot::opportunities_from_path;
use opportunity_match::matching::{
    normalize_tags, open_opportunities, rank_counterparts_for_subject, InterestTag, MatchFilter,
    MatchResult, MatchWeights, SkillProfile,
};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Student skills, comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) student_skills: Vec<String>,
    /// Student interest tags (SDG numbers), comma separated
    #[arg(long, value_delimiter = ',')]
    pub(crate) student_tags: Vec<u8>,
    /// CSV snapshot with columns id,org_id,status,required_skills,tags
    #[arg(long)]
    pub(crate) opportunities: PathBuf,
    /// Only print the first N ranked opportunities
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Drop opportunities scoring below this value
    #[arg(long)]
    pub(crate) min_score: Option<f64>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let RankArgs {
        student_skills,
        student_tags,
        opportunities,
        limit,
        min_score,
    } = args;

    let student = SkillProfile {
        student_id: "cli".to_string(),
        skills: student_skills,
        interests: normalize_tags(&student_tags),
    };
    let snapshot = opportunities_from_path(&opportunities)?;
    let filter = MatchFilter {
        min_score,
        ..MatchFilter::default()
    };

    let eligible = open_opportunities(snapshot);
    let mut ranked = filter.retain_scores(rank_counterparts_for_subject(
        &student,
        &eligible,
        &config.matching.weights,
    ));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    let stdout = io::stdout();
    render_ranking(&mut stdout.lock(), &config.matching.weights, &ranked)?;
    Ok(())
}

pub(crate) fn render_ranking<W: Write>(
    out: &mut W,
    weights: &MatchWeights,
    ranked: &[MatchResult],
) -> io::Result<()> {
    writeln!(
        out,
        "Ranking with skill weight {:.2} and tag weight {:.2}",
        weights.skill(),
        weights.tag()
    )?;
    if ranked.is_empty() {
        writeln!(out, "No open opportunities matched.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<4} {:<20} {:>7} {:>6} {:>6}  matched",
        "#", "opportunity", "score", "skills", "tags"
    )?;
    for (position, result) in ranked.iter().enumerate() {
        let tags = result
            .tag_overlap
            .iter()
            .map(|tag| InterestTag::label(*tag))
            .collect::<Vec<_>>();
        let mut matched = result.skill_overlap.clone();
        matched.extend(tags);

        writeln!(
            out,
            "{:<4} {:<20} {:>7.2} {:>5.0}% {:>5.0}%  {}",
            position + 1,
            result.counterpart_id,
            result.score,
            result.skill_ratio * 100.0,
            result.tag_ratio * 100.0,
            if matched.is_empty() {
                "-".to_string()
            } else {
                matched.join(", ")
            }
        )?;
    }
    Ok(())
}
