//! Statistics service.

use rounds_shared::types::{ParticipantId, Points, UserId};

use super::types::{LeaderboardEntry, LeaderboardMetric, LeaderboardSort, SortOrder, UserStatistics};
use crate::round::Round;

/// Statistics service.
pub struct StatsService;

impl StatsService {
    /// Aggregates one user's results over the given rounds.
    ///
    /// Only rounds where the user holds a seat count. A game counts as
    /// played when its record has an entry for the user, even a zero one.
    #[must_use]
    pub fn user_statistics(rounds: &[Round], user: &UserId) -> UserStatistics {
        let id = ParticipantId::from(user);
        let mut stats = UserStatistics::empty(user.clone());

        for round in rounds.iter().filter(|r| r.is_participant(user)) {
            stats.rounds_played += 1;
            let mut round_total = Points::ZERO;

            for record in &round.records {
                let Some(&delta) = record.participant_amounts.get(&id) else {
                    continue;
                };
                Self::count_game(&mut stats, delta);
                round_total += delta;
            }

            if round_total.is_positive() {
                stats.rounds_won += 1;
            } else if round_total.is_negative() {
                stats.rounds_lost += 1;
            }
        }

        stats
    }

    /// Ranks every human roster member of the given rounds.
    ///
    /// Users appear once, in the order they are first seen. Ties keep that
    /// order whichever direction is chosen. The table board is never ranked.
    #[must_use]
    pub fn leaderboard(rounds: &[Round], sort: &LeaderboardSort) -> Vec<LeaderboardEntry> {
        let mut seen: Vec<(UserId, Option<String>)> = Vec::new();
        for participant in rounds.iter().flat_map(|r| r.roster.iter()) {
            if !participant.role.is_human() {
                continue;
            }
            match seen.iter_mut().find(|(id, _)| participant.id == *id) {
                Some((_, name)) => {
                    if name.is_none() {
                        name.clone_from(&participant.display_name);
                    }
                }
                None => seen.push((
                    UserId::new(participant.id.as_str()),
                    participant.display_name.clone(),
                )),
            }
        }

        let mut rows: Vec<(Option<String>, UserStatistics)> = seen
            .into_iter()
            .map(|(user, name)| (name, Self::user_statistics(rounds, &user)))
            .collect();

        rows.sort_by(|(_, a), (_, b)| {
            let ordering = match sort.metric {
                LeaderboardMetric::Score => a.total.cmp(&b.total),
                LeaderboardMetric::WinRate => a.win_rate_percent().cmp(&b.win_rate_percent()),
            };
            match sort.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        rows.into_iter()
            .zip(1u32..)
            .map(|((display_name, statistics), rank)| LeaderboardEntry {
                rank,
                display_name,
                statistics,
            })
            .collect()
    }

    fn count_game(stats: &mut UserStatistics, delta: Points) {
        stats.games_played += 1;
        stats.total += delta;

        if delta.is_positive() {
            stats.games_won += 1;
            stats.win_amount += delta;
        } else if delta.is_negative() {
            stats.games_lost += 1;
            stats.loss_amount -= delta;
        } else {
            stats.games_drawn += 1;
        }

        stats.best_game = Some(stats.best_game.map_or(delta, |best| best.max(delta)));
        stats.worst_game = Some(stats.worst_game.map_or(delta, |worst| worst.min(delta)));
    }
}
