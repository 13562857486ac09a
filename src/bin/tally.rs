//! Interactive score keeper
//!
//! Reads commands from stdin and applies them to a session persisted as
//! JSON. Type `help` for the command list.

use clap::Parser;
use colored::Colorize;
use mahjong_tally::engine::Session;
use mahjong_tally::payout::Payout;
use mahjong_tally::players::Registry;
use mahjong_tally::scoring::Action;
use mahjong_tally::scoring::ScoreChange;
use mahjong_tally::*;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser)]
#[command(author, version, about = "Mahjong table score keeper", long_about = None)]
struct Args {
    /// Session file, defaults to $TALLY_STATE or ./tally.json
    #[arg(long)]
    state: Option<PathBuf>,
    /// Log every scoring step
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Parser)]
#[command(no_binary_name = true)]
enum Command {
    #[command(about = "Start over with four named players")]
    New {
        #[arg(required = true, num_args = SEATS)]
        names: Vec<String>,
    },
    #[command(about = "Winner takes a discard from loser", alias = "w")]
    Win {
        winner: PlayerId,
        loser: PlayerId,
        points: Points,
    },
    #[command(about = "Winner draws their own tile", alias = "z")]
    Zimo { winner: PlayerId, points: Points },
    #[command(about = "One discard pays several winners: LOSER id=points...", alias = "m")]
    Multi {
        loser: PlayerId,
        #[arg(required = true)]
        winners: Vec<String>,
    },
    #[command(about = "Player collects the same amount from everyone")]
    Collect { player: PlayerId, amount: Points },
    #[command(about = "Player pays the same amount to everyone")]
    Pay { player: PlayerId, amount: Points },
    #[command(about = "Player pays each opponent its own amount: PLAYER id=points...")]
    Explode {
        player: PlayerId,
        #[arg(required = true)]
        payouts: Vec<String>,
    },
    #[command(about = "Loser gives up the pair held against them")]
    Surrender { loser: PlayerId },
    #[command(about = "Hand the dealer seat to a player")]
    Dealer { id: PlayerId },
    #[command(about = "Dealer keeps the seat without a win")]
    Extend,
    #[command(about = "Score an action without committing it", alias = "p")]
    Preview {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        action: Vec<String>,
    },
    #[command(about = "Revert the latest action", alias = "u")]
    Undo,
    #[command(about = "Print the table and totals", alias = "s")]
    Show,
    #[command(about = "List every committed action", alias = "h")]
    History,
    #[command(about = "Settle totals: DIVISOR [id=adjustment...]")]
    Payout {
        divisor: f64,
        adjustments: Vec<String>,
    },
    #[command(about = "Per player statistics")]
    Stats,
    #[command(about = "Clear scores and history, keep players")]
    Reset,
}

impl Command {
    /// The scoring action this command reports, if it reports one.
    fn action(&self) -> anyhow::Result<Option<Action>> {
        Ok(Some(match self {
            Self::Win {
                winner,
                loser,
                points,
            } => Action::Target {
                winner: *winner,
                loser: *loser,
                points: *points,
            },
            Self::Zimo { winner, points } => Action::SelfDrawn {
                winner: *winner,
                points: *points,
            },
            Self::Multi { loser, winners } => Action::Multi {
                loser: *loser,
                winners: pairs::<Points>(winners)?.into_iter().collect(),
            },
            Self::Collect { player, amount } => Action::Collect {
                player: *player,
                amount: *amount,
            },
            Self::Pay { player, amount } => Action::Pay {
                player: *player,
                amount: *amount,
            },
            Self::Explode { player, payouts } => Action::Explode {
                player: *player,
                payouts: distinct(pairs::<Points>(payouts)?)?,
            },
            Self::Surrender { loser } => Action::Surrender { loser: *loser },
            Self::Dealer { id } => Action::Transfer { dealer: *id },
            Self::Extend => Action::Extend,
            _ => return Ok(None),
        }))
    }
}

/// `id=value` argument.
struct Pair<T>(PlayerId, T);

impl<T> TryFrom<&str> for Pair<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let (id, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected id=value, got {}", s))?;
        Ok(Self(id.trim().parse()?, value.trim().parse()?))
    }
}

/// Keeps argument order, which matters for multi wins.
fn pairs<T>(args: &[String]) -> anyhow::Result<Vec<(PlayerId, T)>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.iter()
        .map(|s| Pair::<T>::try_from(s.as_str()).map(|Pair(id, v)| (id, v)))
        .collect()
}

/// Keyed by player; naming anyone twice is an error rather than an overwrite.
fn distinct<T>(pairs: Vec<(PlayerId, T)>) -> anyhow::Result<BTreeMap<PlayerId, T>> {
    let mut map = BTreeMap::new();
    for (id, value) in pairs {
        if map.insert(id, value).is_some() {
            return Err(anyhow::anyhow!("player {} listed twice", id));
        }
    }
    Ok(map)
}

struct CLI {
    path: PathBuf,
    session: Session,
}

impl CLI {
    fn new(path: PathBuf) -> anyhow::Result<Self> {
        let session = match std::fs::read_to_string(&path) {
            Ok(blob) => Session::load(&blob)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(e) => return Err(e.into()),
        };
        log::info!(
            "[tally] {} with {} entries",
            path.display(),
            session.history().len()
        );
        Ok(Self { path, session })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", self.session);
        loop {
            print!("> ");
            std::io::stdout().flush()?;
            let ref mut input = String::new();
            if std::io::stdin().read_line(input)? == 0 {
                break;
            }
            match input.trim() {
                "" => continue,
                "quit" | "exit" => break,
                line => match self.handle(line) {
                    Err(e) => eprintln!("{}", e.to_string().red()),
                    Ok(_) => continue,
                },
            }
        }
        Ok(())
    }

    fn handle(&mut self, input: &str) -> anyhow::Result<()> {
        let command = Command::try_parse_from(input.split_whitespace())?;
        if let Some(action) = command.action()? {
            return self.commit(action);
        }
        match command {
            Command::New { names } => {
                self.session = Session::new(Registry::named(names)?);
                self.save()?;
                Ok(println!("{}", self.session))
            }
            Command::Preview { action } => self.preview(&action),
            Command::Undo => {
                self.session.undo()?;
                self.save()?;
                Ok(println!("{}", self.session))
            }
            Command::Show => Ok(println!("{}", self.session)),
            Command::History => Ok(self
                .session
                .history()
                .entries()
                .iter()
                .enumerate()
                .for_each(|(i, entry)| println!("{:>3}. {}", i + 1, entry))),
            Command::Payout {
                divisor,
                adjustments,
            } => {
                let payout = Payout::new(divisor, distinct(pairs::<f64>(&adjustments)?)?);
                let amounts = payout.try_project(&self.session.totals())?;
                Ok(amounts.iter().for_each(|(&id, &amount)| {
                    println!("{:<12} {:>10.2}", self.session.players().name(id), amount)
                }))
            }
            Command::Stats => Ok(print!("{}", self.session.stats())),
            Command::Reset => {
                self.session.reset();
                self.save()?;
                Ok(println!("{}", self.session))
            }
            _ => unreachable!("scoring commands are committed above"),
        }
    }

    fn commit(&mut self, action: Action) -> anyhow::Result<()> {
        let winners = winners(&action);
        let cleared = if winners.is_empty() {
            Vec::new()
        } else {
            self.session.table().would_reset(&winners)
        };
        let changes = self.session.apply(action)?.to_vec();
        for lineage in cleared {
            println!("{} {}", "cleared".yellow(), lineage);
        }
        self.print_changes(&changes);
        self.save()?;
        println!("{}", self.session);
        for loser in self.session.players().ids() {
            if self.session.table().surrenderable(loser) {
                println!("{} may surrender", self.session.players().name(loser));
            }
        }
        Ok(())
    }

    fn preview(&self, words: &[String]) -> anyhow::Result<()> {
        let action = Command::try_parse_from(words.iter())?
            .action()?
            .ok_or_else(|| anyhow::anyhow!("only scoring commands can be previewed"))?;
        let outcome = self.session.table().preview(&action)?;
        for lineage in self.session.table().would_reset(&winners(&action)) {
            println!("{} {}", "would clear".yellow(), lineage);
        }
        for bonus in outcome.bonuses.iter() {
            println!("{}", bonus);
        }
        self.print_changes(&outcome.changes);
        Ok(())
    }

    fn print_changes(&self, changes: &[ScoreChange]) {
        for change in changes {
            let delta = format!("{:+}", change.delta);
            let delta = match change.delta {
                d if d > 0 => delta.green(),
                d if d < 0 => delta.red(),
                _ => delta.normal(),
            };
            println!("{:<12} {}", self.session.players().name(change.player), delta);
        }
    }

    fn save(&self) -> anyhow::Result<()> {
        std::fs::write(&self.path, self.session.save()?)?;
        Ok(())
    }
}

fn winners(action: &Action) -> Vec<PlayerId> {
    match action {
        Action::Target { winner, .. } | Action::SelfDrawn { winner, .. } => vec![*winner],
        Action::Multi { winners, .. } => winners.iter().map(|(w, _)| *w).collect(),
        _ => Vec::new(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log(if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });
    let path = args
        .state
        .or_else(|| std::env::var("TALLY_STATE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("tally.json"));
    CLI::new(path)?.run()
}
