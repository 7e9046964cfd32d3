//! Shared test fixture: a small but well-formed project manifest.

pub(crate) const MANIFEST: &str = "// !$*UTF8*$!
{
\tarchiveVersion = 1;
\tobjectVersion = 46;
\tobjects = {

/* Begin PBXBuildFile section */
\t\t13B07FBC1A68108700A75B9A /* AppDelegate.m in Sources */ = {isa = PBXBuildFile; fileRef = 13B07FB01A68108700A75B9A /* AppDelegate.m */; };
/* End PBXBuildFile section */

/* Begin PBXFileReference section */
\t\t13B07FB01A68108700A75B9A /* AppDelegate.m */ = {isa = PBXFileReference; lastKnownFileType = sourcecode.c.objc; path = AppDelegate.m; sourceTree = \"<group>\"; };
/* End PBXFileReference section */

/* Begin PBXGroup section */
\t\t13B07FAE1A68108700A75B9A /* Brigo */ = {
\t\t\tisa = PBXGroup;
\t\t\tchildren = (
\t\t\t\t13B07FB01A68108700A75B9A /* AppDelegate.m */,
\t\t\t);
\t\t\tname = Brigo;
\t\t\tsourceTree = \"<group>\";
\t\t};
/* End PBXGroup section */

/* Begin PBXSourcesBuildPhase section */
\t\t13B07F871A680F5B00A75B9A /* Sources */ = {
\t\t\tisa = PBXSourcesBuildPhase;
\t\t\tbuildActionMask = 2147483647;
\t\t\tfiles = (
\t\t\t\t13B07FBC1A68108700A75B9A /* AppDelegate.m in Sources */,
\t\t\t);
\t\t\trunOnlyForDeploymentPostprocessing = 0;
\t\t};
/* End PBXSourcesBuildPhase section */
\t};
\trootObject = 83CBB9F71A601CBA00E9B192 /* Project object */;
}
";
