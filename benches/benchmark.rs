use chunktree::bracket::parse_flat;
use chunktree::{ChunkTreeParser, Token};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const REGRESSION_SENTENCE_CHUNKS: &[(&str, usize)] = &[("short", 4), ("medium", 32), ("long", 256)];

const REPORTING_SENTENCE_CHUNKS: &[(&str, usize)] = &[("very long", 2048)];

/// A synthetic sentence of `num_chunks` chunks: chunker output, tokens and one
/// detector output marking every fourth noun phrase.
struct Sentence {
    chunk_output: String,
    tokens: Vec<Token>,
    detector_output: String,
}

fn sentence(num_chunks: usize) -> Sentence {
    let mut chunks = Vec::with_capacity(num_chunks);
    let mut tokens = Vec::new();
    let mut marked = Vec::new();

    for i in 0..num_chunks {
        let word = format!("w{i}");
        if i % 2 == 0 {
            chunks.push(format!("[NP the_DT {word}_NN ]"));
            tokens.push(Token::new("the", "DT"));
            tokens.push(Token::new(word.as_str(), "NN"));
            if i % 4 == 0 {
                marked.push(format!("<START:thing> the {word} <END>"));
            } else {
                marked.push(format!("the {word}"));
            }
        } else {
            chunks.push(format!("[VP {word}_VBZ ] ,_,"));
            tokens.push(Token::new(word.as_str(), "VBZ"));
            tokens.push(Token::new(",", ","));
            marked.push(format!("{word} ,"));
        }
    }

    Sentence { chunk_output: chunks.join(" "), tokens, detector_output: marked.join(" ") }
}

fn build_and_merge(parser: &ChunkTreeParser, sentence: &Sentence) {
    let tree = parser
        .parse(&sentence.tokens, &sentence.chunk_output, &[sentence.detector_output.as_str()])
        .unwrap();
    black_box(tree);
}

fn flat_parsing(c: &mut Criterion) {
    for (name, num_chunks) in REGRESSION_SENTENCE_CHUNKS {
        let sentence = sentence(*num_chunks);
        c.bench_function(&format!("flat {name}"), |b| {
            b.iter(|| black_box(parse_flat(&sentence.chunk_output, "S").unwrap()));
        });
    }
}

fn full_pipeline(c: &mut Criterion) {
    let parser = ChunkTreeParser::default();
    for (name, num_chunks) in REGRESSION_SENTENCE_CHUNKS {
        let sentence = sentence(*num_chunks);
        c.bench_function(&format!("pipeline {name}"), |b| {
            b.iter(|| build_and_merge(&parser, &sentence));
        });
    }
}

fn pipeline_reporting(c: &mut Criterion) {
    let parser = ChunkTreeParser::default();
    for (name, num_chunks) in REPORTING_SENTENCE_CHUNKS {
        let sentence = sentence(*num_chunks);
        c.bench_function(&format!("pipeline {name}"), |b| {
            b.iter(|| build_and_merge(&parser, &sentence));
        });
    }
}

criterion_group!(regression, flat_parsing, full_pipeline);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = pipeline_reporting
}
criterion_main!(regression, reporting);
