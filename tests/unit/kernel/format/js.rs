use super::*;

#[test]
fn function_body_is_indented() {
    assert_eq!(
        format_js("function f(){return 1;}"),
        "function f() {\n  return 1;\n}"
    );
}

#[test]
fn statements_break_onto_lines() {
    assert_eq!(format_js("a();b();  c();"), "a();\nb();\nc();");
}

#[test]
fn else_catch_finally_stay_on_the_closing_line() {
    assert_eq!(
        format_js("if(a){b();}else{c();}"),
        "if(a) {\n  b();\n} else {\n  c();\n}"
    );
    assert_eq!(
        format_js("try{x();}\ncatch(e){y();}finally{z();}"),
        "try {\n  x();\n} catch(e) {\n  y();\n} finally {\n  z();\n}"
    );
}

#[test]
fn closing_brace_keeps_terminators() {
    assert_eq!(format_js("var o = {a:1};"), "var o = {\n  a:1\n};");
    assert_eq!(
        format_js("run(function(){go();});"),
        "run(function() {\n  go();\n});"
    );
}

#[test]
fn for_header_semicolons_do_not_break() {
    assert_eq!(
        format_js("for(var i=0;i<n;i++){sum+=i;}"),
        "for(var i=0;i<n;i++) {\n  sum+=i;\n}"
    );
}

#[test]
fn literals_and_comments_are_untouched() {
    assert_eq!(
        format_js("var s = \"a{b;c}\";var t = 'it\\'s;{';"),
        "var s = \"a{b;c}\";\nvar t = 'it\\'s;{';"
    );
    assert_eq!(
        format_js("var u = `x ${y} {;}`;"),
        "var u = `x ${y} {;}`;"
    );
    assert_eq!(format_js("/* a; { */x();"), "/* a; { */x();");
    assert_eq!(format_js("a(); // b; {\nc();"), "a(); // b; {\nc();");
}

#[test]
fn blank_lines_collapse_to_one() {
    assert_eq!(
        format_js("function a(){}\n\n\n\nfunction b(){}"),
        "function a() {\n}\n\nfunction b() {\n}"
    );
    assert_eq!(format_js("a\n\n\n\n\nb"), "a\n\nb");
}

#[test]
fn nested_blocks_reindent_existing_lines() {
    let input = "function f() {\nif (x) {\n        y();\n}\n}";
    assert_eq!(
        format_js(input),
        "function f() {\n  if (x) {\n    y();\n  }\n}"
    );
}

#[test]
fn second_pass_is_stable() {
    let inputs = [
        "function f(){return 1;}",
        "if(a){b();}else{c();}",
        "var o = {a:1, b:{c:2}};",
        "run(function(){go();});\n\n\nfor(var i=0;i<3;i++){log(i); // tick\n}",
        "const s = 'x;y'; let t = \"{\";",
    ];
    for input in inputs {
        let once = format_js(input);
        assert_eq!(format_js(&once), once, "input: {input}");
    }
}

#[test]
fn unbalanced_input_never_panics() {
    assert_eq!(format_js("}}}"), "}\n}\n}");
    assert_eq!(format_js("{{"), "{\n  {");
    assert_eq!(format_js("\"never closed\nx();"), "\"never closed\nx();");
    assert_eq!(format_js(""), "");
}
