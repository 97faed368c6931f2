extern crate rsg;

#[cfg(test)]
mod std_trait {
    use std::str::FromStr;

    use rsg::{Definition, Grammar, Production, Term};

    fn std_str_trait<T: FromStr>(_: T, input: &str) {
        let from_str_result = T::from_str(input);
        assert!(from_str_result.is_ok())
    }

    #[test]
    fn production_from_str() {
        let input = "😵 <😋> 😉 ;";
        let production = Production::new();
        std_str_trait(production, input)
    }

    #[test]
    fn definition_from_str() {
        let input = "{ <🤘> 👏 👊 ; 👌 ; }";
        let definition = Definition::new("🤘");
        std_str_trait(definition, input)
    }

    #[test]
    fn grammar_from_str() {
        let input = "{ <🙃> 😵 <🤘> ; 😉 ; }
        { <🤘> 👏 👊 ; 👌 ; }";
        let grammar = Grammar::new();
        std_str_trait(grammar, input)
    }

    #[test]
    fn terminal_from_str() {
        let input = "👏";
        let terminal = Term::Terminal(String::new());
        std_str_trait(terminal, input)
    }

    #[test]
    fn nonterminal_from_str() {
        let input = "<🤘>";
        let nonterminal = Term::Nonterminal(String::new());
        std_str_trait(nonterminal, input)
    }
}
