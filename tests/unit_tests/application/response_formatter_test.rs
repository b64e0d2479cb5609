use chatforge::application::services::format_response;

#[test]
fn given_unspaced_header_when_formatting_then_space_and_blank_line_are_added() {
    let formatted = format_response("Intro text\n##Pricing\nDetails");

    assert_eq!(formatted, "Intro text\n\n## Pricing\nDetails");
}

#[test]
fn given_mixed_list_markers_when_formatting_then_they_are_normalized() {
    let formatted = format_response("Options:\n* one\n• two\n1) three");

    assert_eq!(formatted, "Options:\n\n- one\n- two\n1. three");
}

#[test]
fn given_bold_text_at_line_start_when_formatting_then_it_is_not_a_bullet() {
    assert_eq!(format_response("**Note** this"), "**Note** this");
}

#[test]
fn given_code_block_when_formatting_then_its_content_is_untouched() {
    let text = "Run:\n```\n* not a bullet\n\n\n#comment\n```";

    assert_eq!(format_response(text), text);
}

#[test]
fn given_messy_markdown_when_formatting_twice_then_second_pass_changes_nothing() {
    let inputs = [
        "#Title\nSome text\n* a\n+ b\n\n\n\n2) c\ntrailing   \n###Sub\n- done",
        "Hours:\n1) Mon\n2) Tue\n\n\n\n##Contact\n• phone",
        "plain sentence",
        "",
    ];

    for input in inputs {
        let once = format_response(input);
        assert_eq!(format_response(&once), once, "input: {input:?}");
    }
}
