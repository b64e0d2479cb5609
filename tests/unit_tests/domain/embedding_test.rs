use chatforge::domain::Embedding;

#[test]
fn given_identical_vectors_when_comparing_then_similarity_is_one() {
    let a = Embedding::new(vec![0.3, 0.4, 0.5]);

    assert!((a.cosine_similarity(&a.clone()) - 1.0).abs() < 1e-6);
}

#[test]
fn given_orthogonal_vectors_when_comparing_then_similarity_is_zero() {
    let a = Embedding::new(vec![1.0, 0.0]);
    let b = Embedding::new(vec![0.0, 1.0]);

    assert_eq!(a.cosine_similarity(&b), 0.0);
}

#[test]
fn given_mismatched_or_zero_vectors_when_comparing_then_similarity_is_zero() {
    let a = Embedding::new(vec![1.0, 2.0, 3.0]);

    assert_eq!(a.cosine_similarity(&Embedding::new(vec![1.0, 2.0])), 0.0);
    assert_eq!(a.cosine_similarity(&Embedding::new(vec![0.0; 3])), 0.0);
}
