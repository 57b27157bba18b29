use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prepwise_core::parser::{parse_question_bank_str, validate_question_bank};

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    for n in [5usize, 50, 200] {
        let toml = generate_bank_toml(n);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| parse_question_bank_str(black_box(&toml), black_box("bench.toml".as_ref())))
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let toml = generate_bank_toml(200);
    let bank = match parse_question_bank_str(&toml, "bench.toml".as_ref()) {
        Ok(bank) => bank,
        Err(e) => panic!("bench bank failed to parse: {e:#}"),
    };

    c.bench_function("validate_200_questions", |b| {
        b.iter(|| validate_question_bank(black_box(&bank)))
    });
}

fn generate_bank_toml(n: usize) -> String {
    let roles = ["frontend", "backend", "fullstack", "hr", "aptitude"];
    let difficulties = ["easy", "medium", "hard"];
    let mut s = String::new();
    s.push_str(
        r#"[bank]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        let role = roles[i % roles.len()];
        let difficulty = difficulties[i % difficulties.len()];
        s.push_str(&format!(
            r#"
[[questions]]
id = "q_{i}"
question = "Benchmark question {i}?"
options = ["first", "second", "third", "fourth"]
answer = {answer}
difficulty = "{difficulty}"
role = "{role}"
category = "technical"
explanation = "Option {answer} is correct."
"#,
            answer = i % 4,
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing, bench_validation);
criterion_main!(benches);
