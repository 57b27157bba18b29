use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prepwise_core::evaluation::Evaluator;
use prepwise_core::model::{
    round_percentage, AnsweredQuestion, Category, Difficulty, Question, Role,
};
use prepwise_core::scoring::{score_submission, SubmittedAnswer};

fn make_questions(n: usize) -> Vec<Question> {
    let categories = [Category::Technical, Category::Hr, Category::Aptitude];
    let difficulties = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
    (0..n)
        .map(|i| Question {
            id: format!("q{i}"),
            text: format!("Question {i}"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: (i % 4) as u8,
            difficulty: Some(difficulties[i % 3].clone()),
            role: Role::Backend,
            category: Some(categories[(i / 3) % 3].clone()),
            explanation: None,
        })
        .collect()
}

fn make_answers(questions: &[Question]) -> Vec<AnsweredQuestion> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| AnsweredQuestion {
            question_id: q.id.clone(),
            selected_option: Some(q.correct_option),
            is_correct: i % 3 != 0,
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let evaluator = Evaluator::default();

    for n in [10usize, 100, 1000] {
        let questions = make_questions(n);
        let answers = make_answers(&questions);
        let score = answers.iter().filter(|a| a.is_correct).count() as u32;
        let percentage = round_percentage(score, n as u32);

        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| {
                evaluator.evaluate(
                    black_box(&questions),
                    black_box(&answers),
                    Role::Backend,
                    score,
                    n as u32,
                    percentage,
                )
            })
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let questions = make_questions(100);
    let submitted: Vec<SubmittedAnswer> = questions
        .iter()
        .map(|q| SubmittedAnswer {
            question_id: q.id.clone(),
            selected_option: Some(0),
        })
        .collect();

    c.bench_function("score_100_answers", |b| {
        b.iter(|| score_submission(black_box(&questions), black_box(&submitted)))
    });
}

criterion_group!(benches, bench_evaluate, bench_scoring);
criterion_main!(benches);
