use crate::model::hand::HandBelief;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: String,
    pub team: String,
    pub hand: HandBelief,
}

impl Player {
    /// A player about whose hand nothing is known yet.
    pub fn new(id: impl Into<String>, team: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            team: team.into(),
            hand: HandBelief::fresh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Player;

    #[test]
    fn new_player_starts_with_a_fresh_hand() {
        let player = Player::new("p1", "team1");
        assert_eq!(player.id, "p1");
        assert_eq!(player.team, "team1");
        assert_eq!(player.hand.candidates().len(), 32);
    }
}
