use super::*;
use std::io;

fn sample(w: &mut dyn CodeWriter) {
    w.str("#define ").str("x").str("(");
    join(w, ",", ["a", "b", "c"], |w, p| {
        w.str(p);
    });
    w.str(")").int(0).int(42).int(1_000_000);
}

#[test]
fn test_string_writer_sequence() {
    assert_eq!(render(sample), "#define x(a,b,c)0421000000");
}

#[test]
fn test_join_separators() {
    let text = render(|w| join(w, ":", 0..3u64, |w, i| {
        w.int(i);
    }));
    assert_eq!(text, "0:1:2");
    assert_eq!(render(|w| join(w, ":", Vec::<u64>::new(), |w, i| {
        w.int(i);
    })), "");
}

#[test]
fn test_length_writer_agrees_with_text() {
    assert_eq!(measure(sample), render(sample).len());
    for n in [0u64, 9, 10, 99, 100, 12345, u64::MAX] {
        assert_eq!(measure(|w| {
            w.int(n);
        }), n.to_string().len());
    }
}

#[test]
fn test_save_and_replay() {
    let mut w = StringWriter::new();
    w.str("<");
    let saved = w.save(&mut |w| {
        w.str("abc");
    });
    assert_eq!(w.as_str(), "<");
    assert_eq!(saved, Saved::Text("abc".into()));
    w.replay(&saved).replay(&saved).str(">");
    assert_eq!(w.as_str(), "<abcabc>");

    let mut len = LengthWriter::new();
    let saved = len.save(&mut |w| {
        w.str("abc").int(12);
    });
    assert_eq!(saved, Saved::Len(5));
    assert!(len.is_empty());
    len.replay(&saved);
    assert_eq!(len.len(), 5);
}

struct CountingSink {
    data: Vec<u8>,
    writes: usize,
}

impl io::Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_writer_batches_writes() {
    let mut sink = CountingSink { data: Vec::new(), writes: 0 };
    let mut w = SinkWriter::new(&mut sink);
    let chunk = "x".repeat(1000);
    for _ in 0..20 {
        w.str(&chunk);
    }
    let saved = w.save(&mut |w| {
        w.str("tail");
    });
    w.replay(&saved);
    let written = w.finish().unwrap();
    assert_eq!(written, 20_004);
    assert_eq!(sink.data.len(), 20_004);
    assert!(sink.writes <= 3, "{} writes", sink.writes);
}

struct FailingSink;

impl io::Write for FailingSink {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Other, "disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_writer_reports_first_error() {
    let mut w = SinkWriter::new(FailingSink);
    w.str("data");
    let err = w.finish().unwrap_err();
    assert_eq!(err.to_string(), "disk full");
}
