#![no_main]
use std::cell::RefCell;
use std::convert::Infallible;

use arbitrary::Arbitrary;
use jsonfsm::{
    Container, Flow, Handler, Number, ParseError, Parser, ParserOptions, RecursionGuard, Span,
    Status, StringRole, chunk_utils::split_by_seeds,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng; // faster than StdRng
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    // One SmallRng per thread, seeded once from the host OS
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

/// JSON whitespace, plus Unicode spaces the grammar must reject.
static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    "\u{00A0}".as_bytes(),
    "\u{2028}".as_bytes(),
    "\u{3000}".as_bytes(),
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x07);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size {
            let limit = max_size - prefix;

            prefix += append_whitespace(&mut data[prefix..], limit);
            prefix += append_value(&mut data[prefix..], size, limit);
            prefix += append_whitespace(&mut data[prefix..], limit);
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends up to eight whitespace entries without exceeding `limit`.
fn append_whitespace(buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        if limit == 0 {
            return 0;
        }

        let n = rng.random_range(1..=limit.min(8));
        let mut written = 0;
        for _ in 0..n {
            // mostly valid whitespace
            let w = if rng.random_ratio(15, 16) {
                WS_TABLE[rng.random_range(0..4)]
            } else {
                WS_TABLE[rng.random_range(4..WS_TABLE.len())]
            };
            if written + w.len() > limit {
                break;
            }
            buf[written..written + w.len()].copy_from_slice(w);
            written += w.len();
        }
        written
    })
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        match ArbitraryDocument::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            Ok(value) => break value,
            Err(_) => continue,
        };
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");

    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::from(u.arbitrary::<i64>()?),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// A top-level array or object.
#[derive(Debug)]
struct ArbitraryDocument(Value);

impl<'a> Arbitrary<'a> for ArbitraryDocument {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        match ArbitraryValue::arbitrary(u)?.0 {
            doc @ (Value::Array(_) | Value::Object(_)) => Ok(ArbitraryDocument(doc)),
            scalar => Ok(ArbitraryDocument(Value::Array(vec![scalar]))),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Event {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    StringStart(StringRole, usize),
    Data(StringRole, Vec<u8>),
    Unicode(StringRole, u16),
    StringEnd(StringRole, Span),
    Boolean(bool),
    Null,
    Number(Number),
    End,
}

/// Records callbacks, merging adjacent data runs, and optionally pauses on
/// every pausable callback.
struct Recorder {
    events: Vec<Event>,
    pause: bool,
}

impl Recorder {
    fn flow(&self) -> Result<Flow, Infallible> {
        Ok(if self.pause { Flow::Pause } else { Flow::Continue })
    }

    fn push(&mut self, event: Event) -> Result<Flow, Infallible> {
        self.events.push(event);
        self.flow()
    }
}

impl Handler for Recorder {
    type Error = Infallible;

    fn on_object_start(&mut self) -> Result<Flow, Infallible> {
        self.push(Event::ObjectStart)
    }

    fn on_object_end(&mut self) -> Result<Flow, Infallible> {
        self.push(Event::ObjectEnd)
    }

    fn on_array_start(&mut self) -> Result<Flow, Infallible> {
        self.push(Event::ArrayStart)
    }

    fn on_array_end(&mut self) -> Result<Flow, Infallible> {
        self.push(Event::ArrayEnd)
    }

    fn on_string_start(&mut self, role: StringRole, start: usize) -> Result<Flow, Infallible> {
        self.push(Event::StringStart(role, start))
    }

    fn on_string_data(&mut self, role: StringRole, data: &[u8]) -> Result<(), Infallible> {
        if let Some(Event::Data(last, run)) = self.events.last_mut() {
            if *last == role {
                run.extend_from_slice(data);
                return Ok(());
            }
        }
        self.events.push(Event::Data(role, data.to_vec()));
        Ok(())
    }

    fn on_unicode_escape(&mut self, role: StringRole, unit: u16) -> Result<(), Infallible> {
        self.events.push(Event::Unicode(role, unit));
        Ok(())
    }

    fn on_string_end(&mut self, role: StringRole, span: Span) -> Result<Flow, Infallible> {
        self.push(Event::StringEnd(role, span))
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), Infallible> {
        self.events.push(Event::Boolean(value));
        Ok(())
    }

    fn on_null(&mut self) -> Result<(), Infallible> {
        self.events.push(Event::Null);
        Ok(())
    }

    fn on_number(&mut self, number: Number) -> Result<(), Infallible> {
        self.events.push(Event::Number(number));
        Ok(())
    }

    fn on_end(&mut self) -> Result<Flow, Infallible> {
        self.push(Event::End)
    }
}

type Outcome = (Vec<Event>, Result<(), ParseError<Infallible>>);

fn run(chunks: &[&[u8]], options: ParserOptions, pause: bool) -> Outcome {
    let recorder = Recorder {
        events: Vec::new(),
        pause,
    };
    let guard = RecursionGuard::new(Vec::<Container>::new(), 64).unwrap();
    let mut parser = Parser::with_options(recorder, guard, options);
    let result = (|| {
        for chunk in chunks {
            let mut rest = *chunk;
            while let Status::Paused { consumed } = parser.feed(rest)? {
                rest = &rest[consumed..];
            }
        }
        parser.finish()
    })();
    (parser.into_parts().0.events, result)
}

fn chunked_feed(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u64::from(u32::from_le_bytes(data[1..5].try_into().unwrap()));
    let data = &data[HEADER..];

    let options = ParserOptions {
        allow_multiple_documents: flags & 1 != 0,
        allow_control_characters: flags & 2 != 0,
    };
    let pause = flags & 4 != 0;

    let mut rng = SmallRng::seed_from_u64(split_seed);
    let seeds: Vec<usize> = (0..rng.random_range(0..32)).map(|_| rng.random()).collect();
    let chunks = split_by_seeds(data, &seeds);

    let whole = run(&[data], options, false);
    let split = run(&chunks, options, pause);

    // The split run may lend one extra run before an error the whole run
    // reports first; the error itself must match.
    assert_eq!(whole.1, split.1, "error differs for {chunks:?}");
    if whole.1.is_ok() {
        assert_eq!(whole.0, split.0, "callbacks differ for {chunks:?}");
    }
}

fuzz_target!(|data: &[u8]| chunked_feed(data));
