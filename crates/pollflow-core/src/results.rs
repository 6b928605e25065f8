use pollflow_models::Poll;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTally {
    pub option_id: String,
    pub text: String,
    pub votes: i64,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    pub total_votes: i64,
    pub options: Vec<OptionTally>,
}

/// Aggregate a choice poll's vote counts for display. Pure function over the
/// poll record; the option order is preserved.
pub fn tally(poll: &Poll) -> VoteTally {
    let total_votes: i64 = poll.options.iter().map(|o| o.votes).sum();
    let options = poll
        .options
        .iter()
        .map(|o| OptionTally {
            option_id: o.id.clone(),
            text: o.text.clone(),
            votes: o.votes,
            percent: share(o.votes, total_votes),
        })
        .collect();
    VoteTally {
        total_votes,
        options,
    }
}

/// An option's share of the total, as a rounded whole percentage. Defined as
/// 0 when no votes have been cast at all.
pub fn share(votes: i64, total: i64) -> u32 {
    if total <= 0 {
        return 0;
    }
    ((votes as f64 / total as f64) * 100.0).round() as u32
}
