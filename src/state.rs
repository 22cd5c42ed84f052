use crate::maze::Pos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mover {
    Agent,
    Adversary(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Cleared,
    Caught,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    agent: Pos,
    adversaries: Vec<Pos>,
    pellets: Vec<Pos>,
    turn: usize,
    pub(crate) dead: bool,
    pub(crate) steps_since_pellet: u32,
    pub weight: f64,
    steps: u64,
}

impl GameState {
    pub fn new(agent: Pos, adversaries: Vec<Pos>, pellets: Vec<Pos>) -> Self {
        GameState {
            agent,
            adversaries,
            pellets,
            turn: 0,
            dead: false,
            steps_since_pellet: 0,
            weight: 0.0,
            steps: 0,
        }
    }

    pub fn agent(&self) -> Pos {
        self.agent
    }

    pub fn adversaries(&self) -> &[Pos] {
        &self.adversaries
    }

    pub fn pellets(&self) -> &[Pos] {
        &self.pellets
    }

    /// 0 for the agent, `k` for adversary `k - 1`.
    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn steps_since_pellet(&self) -> u32 {
        self.steps_since_pellet
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn mover(&self) -> Mover {
        match self.turn {
            0 => Mover::Agent,
            k => Mover::Adversary(k - 1),
        }
    }

    pub fn mover_pos(&self) -> Pos {
        self.position_of(self.mover())
    }

    pub fn position_of(&self, mover: Mover) -> Pos {
        match mover {
            Mover::Agent => self.agent,
            Mover::Adversary(i) => self.adversaries[i],
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if self.dead {
            Some(Outcome::Caught)
        } else if self.pellets.is_empty() {
            Some(Outcome::Cleared)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Moves the current mover to `to` and passes the turn.
    pub fn advance(&self, to: Pos) -> GameState {
        let mut child = self.clone();
        match self.mover() {
            Mover::Agent => {
                child.agent = to;
                child.steps_since_pellet += 1;
            }
            Mover::Adversary(i) => child.adversaries[i] = to,
        }
        child.turn = (self.turn + 1) % (self.adversaries.len() + 1);
        child.steps += 1;
        child.weight = 0.0;
        child
    }

    pub(crate) fn take_pellet(&mut self, pos: Pos) -> bool {
        match self.pellets.iter().position(|&p| p == pos) {
            Some(idx) => {
                self.pellets.remove(idx);
                self.steps_since_pellet = 0;
                true
            }
            None => false,
        }
    }

    pub(crate) fn agent_caught(&self) -> bool {
        self.adversaries.iter().any(|&a| a == self.agent)
    }
}
