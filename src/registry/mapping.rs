//! Static ecosystem ↔ registry table.

/// Ecosystem short name → registry host, as named by the ecosyste.ms API.
///
/// Keys are lowercase and unique. The reverse direction is answered from this
/// same table, so adding a pair here is all it takes to support a new
/// ecosystem.
const ECOSYSTEM_REGISTRIES: &[(&str, &str)] = &[
    ("npm", "npmjs.org"),
    ("go", "proxy.golang.org"),
    ("docker", "hub.docker.com"),
    ("pypi", "pypi.org"),
    ("nuget", "nuget.org"),
    ("maven", "repo1.maven.org"),
    ("packagist", "packagist.org"),
    ("cargo", "crates.io"),
    ("rubygems", "rubygems.org"),
    ("cocoapods", "cocoapods.org"),
    ("pub", "pub.dev"),
    ("bower", "bower.io"),
    ("cpan", "metacpan.org"),
    ("alpine", "alpine-edge"),
    ("actions", "github actions"),
    ("cran", "cran.r-project.org"),
    ("clojars", "clojars.org"),
    ("conda", "conda-forge.org"),
    ("hex", "hex.pm"),
    ("hackage", "hackage.haskell.org"),
    ("julia", "juliahub.com"),
    ("swiftpm", "swiftpackageindex.com"),
    ("openvsx", "open-vsx.org"),
    ("spack", "spack.io"),
    ("homebrew", "formulae.brew.sh"),
    ("adelie", "pkg.adelielinux.org"),
    ("puppet", "forge.puppet.com"),
    ("deno", "deno.land"),
    ("elm", "package.elm-lang.org"),
    ("vcpkg", "vcpkg.io"),
    ("racket", "pkgs.racket-lang.org"),
    ("bioconductor", "bioconductor.org"),
    ("carthage", "carthage"),
    ("postmarketos", "postmarketos-master"),
    ("elpa", "elpa.gnu.org"),
];

/// Registry host for an ecosystem, ignoring case.
pub fn ecosystem_to_registry(ecosystem: &str) -> Option<&'static str> {
    let ecosystem = ecosystem.to_lowercase();
    ECOSYSTEM_REGISTRIES
        .iter()
        .find(|(eco, _)| *eco == ecosystem)
        .map(|(_, registry)| *registry)
}

/// Ecosystem for a registry host, ignoring case.
pub fn registry_to_ecosystem(registry: &str) -> Option<&'static str> {
    let registry = registry.to_lowercase();
    ECOSYSTEM_REGISTRIES
        .iter()
        .find(|(_, reg)| *reg == registry)
        .map(|(ecosystem, _)| *ecosystem)
}

/// All known ecosystem keys, in table order.
pub fn supported_ecosystems() -> impl Iterator<Item = &'static str> {
    ECOSYSTEM_REGISTRIES.iter().map(|(ecosystem, _)| *ecosystem)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_unicode_case_folding() {
        // KELVIN SIGN lowercases to ASCII 'k'
        let ecosystem = "HAC\u{212A}AGE";
        assert_eq!(ecosystem.to_lowercase(), "hackage");
        assert_eq!(ecosystem_to_registry(ecosystem), Some("hackage.haskell.org"));
        assert_eq!(
            ecosystem_to_registry(ecosystem),
            ecosystem_to_registry(&ecosystem.to_lowercase())
        );
        assert_eq!(registry_to_ecosystem("HAC\u{212A}AGE.HASKELL.ORG"), Some("hackage"));
    }

    #[test]
    fn test_known_mappings() {
        assert_eq!(ecosystem_to_registry("npm"), Some("npmjs.org"));
        assert_eq!(ecosystem_to_registry("pypi"), Some("pypi.org"));
        assert_eq!(ecosystem_to_registry("rubygems"), Some("rubygems.org"));
        assert_eq!(ecosystem_to_registry("cargo"), Some("crates.io"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(ecosystem_to_registry("NPM"), Some("npmjs.org"));
        assert_eq!(ecosystem_to_registry("PyPi"), Some("pypi.org"));
        for (eco, _) in ECOSYSTEM_REGISTRIES {
            let upper = eco.to_uppercase();
            assert_eq!(ecosystem_to_registry(&upper), ecosystem_to_registry(&upper.to_lowercase()));
        }
        assert_eq!(registry_to_ecosystem("Crates.IO"), Some("cargo"));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(ecosystem_to_registry("unknown"), None);
        assert_eq!(ecosystem_to_registry(""), None);
        assert_eq!(registry_to_ecosystem("example.com"), None);
    }

    #[test]
    fn test_round_trip_every_pair() {
        for (eco, reg) in ECOSYSTEM_REGISTRIES {
            assert_eq!(ecosystem_to_registry(eco), Some(*reg));
            assert_eq!(registry_to_ecosystem(reg), Some(*eco));
        }
    }

    #[test]
    fn test_keys_and_values_unique() {
        let ecosystems: HashSet<_> = supported_ecosystems().collect();
        let registries: HashSet<_> = ECOSYSTEM_REGISTRIES.iter().map(|(_, r)| *r).collect();
        assert_eq!(ecosystems.len(), ECOSYSTEM_REGISTRIES.len());
        assert_eq!(registries.len(), ECOSYSTEM_REGISTRIES.len());
        assert_eq!(ECOSYSTEM_REGISTRIES.len(), 35);
    }
}
